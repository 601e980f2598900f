//! 路由卡片的展开/收起状态。状态按卡片在本次渲染中的下标保存，
//! 不写入 RouteConfig，每次渲染重建，全部默认收起。

pub const GLYPH_CLOSED: char = '▼';
pub const GLYPH_OPEN: char = '▲';

/// 展开时卡片正文的上内边距（px）
const OPEN_PADDING_TOP: u32 = 10;

/// 卡片正文的样式：高度、透明度、上内边距
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyStyle {
    pub max_height: u32,
    pub opacity: f32,
    pub padding_top: u32,
}

impl BodyStyle {
    pub const COLLAPSED: BodyStyle = BodyStyle {
        max_height: 0,
        opacity: 0.0,
        padding_top: 0,
    };

    /// 展开：高度等于正文自然高度
    pub fn expanded(natural_height: u32) -> Self {
        Self {
            max_height: natural_height,
            opacity: 1.0,
            padding_top: OPEN_PADDING_TOP,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.max_height == 0 && self.opacity == 0.0 && self.padding_top == 0
    }

    /// 内联 CSS
    pub fn to_css(&self) -> String {
        if self.is_collapsed() {
            "max-height:0;opacity:0;padding-top:0".to_string()
        } else {
            format!(
                "max-height:{}px;opacity:{};padding-top:{}px",
                self.max_height, self.opacity, self.padding_top
            )
        }
    }
}

/// 多开手风琴：每张卡片独立开关
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Accordion {
    open: Vec<bool>,
}

impl Accordion {
    /// 新建 `cards` 张全部收起的卡片状态
    pub fn collapsed(cards: usize) -> Self {
        Self {
            open: vec![false; cards],
        }
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    /// 翻转卡片开关，返回新状态；下标越界返回 None
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let slot = self.open.get_mut(index)?;
        *slot = !*slot;
        Some(*slot)
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.open.get(index).copied().unwrap_or(false)
    }

    pub fn open_count(&self) -> usize {
        self.open.iter().filter(|o| **o).count()
    }

    /// 方向指示符，与开关状态同步
    pub fn glyph(&self, index: usize) -> char {
        if self.is_open(index) {
            GLYPH_OPEN
        } else {
            GLYPH_CLOSED
        }
    }

    pub fn body_style(&self, index: usize, natural_height: u32) -> BodyStyle {
        if self.is_open(index) {
            BodyStyle::expanded(natural_height)
        } else {
            BodyStyle::COLLAPSED
        }
    }
}
