//! Paged exam → paper selection menus.
//!
//! The menus keep no server-side session: everything needed to draw the
//! next page travels inside the button payload ([`MenuAction`]), which
//! Telegram hands back when the button is pressed.
//!
//! Payload grammar:
//!
//! ```text
//! exams:<page>
//! papers:<page>:<percent-encoded exam title>
//! papers:<page>:#<exam index>      (title too long for callback data)
//! paper:<metaId>
//! ```

use tracing::warn;

use crate::catalog::find_exam;
use crate::content::ExamCategory;
use crate::text::html_escape;

/// Items shown per page.
pub const PAGE_SIZE: usize = 6;

/// Telegram rejects callback data longer than this many bytes.
pub const CALLBACK_DATA_LIMIT: usize = 64;

pub const PREVIOUS_LABEL: &str = "⬅️ Previous";
pub const NEXT_LABEL: &str = "➡️ Next";
pub const BACK_LABEL: &str = "🔙 Back to Exams";

/// How a papers payload points back at its exam.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExamRef {
    Title(String),
    Index(usize),
}

/// A decoded button payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    /// Show a page of the exam list.
    ExamsPage(usize),
    /// Show a page of one exam's papers.
    PapersPage { exam: ExamRef, page: usize },
    /// A paper was picked.
    Paper(String),
}

impl MenuAction {
    /// Papers payload for the exam at `index`, preferring its title and
    /// falling back to the index when the title would not fit.
    pub fn papers(index: usize, title: &str, page: usize) -> Self {
        let by_title = Self::PapersPage {
            exam: ExamRef::Title(title.to_string()),
            page,
        };
        if by_title.encode().len() <= CALLBACK_DATA_LIMIT {
            by_title
        } else {
            Self::PapersPage {
                exam: ExamRef::Index(index),
                page,
            }
        }
    }

    pub fn encode(&self) -> String {
        match self {
            Self::ExamsPage(page) => format!("exams:{page}"),
            Self::PapersPage {
                exam: ExamRef::Title(title),
                page,
            } => format!("papers:{page}:{}", urlencoding::encode(title)),
            Self::PapersPage {
                exam: ExamRef::Index(index),
                page,
            } => format!("papers:{page}:#{index}"),
            Self::Paper(meta_id) => format!("paper:{meta_id}"),
        }
    }

    /// Decode a payload. Anything that does not follow the grammar is `None`.
    pub fn parse(data: &str) -> Option<Self> {
        if let Some(page) = data.strip_prefix("exams:") {
            return page.parse().ok().map(Self::ExamsPage);
        }

        if let Some(rest) = data.strip_prefix("papers:") {
            let (page, exam) = rest.split_once(':')?;
            let page = page.parse().ok()?;
            let exam = match exam.strip_prefix('#') {
                Some(index) => ExamRef::Index(index.parse().ok()?),
                None => ExamRef::Title(urlencoding::decode(exam).ok()?.into_owned()),
            };
            return Some(Self::PapersPage { exam, page });
        }

        data.strip_prefix("paper:")
            .filter(|id| !id.is_empty())
            .map(|id| Self::Paper(id.to_string()))
    }
}

/// One inline button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuButton {
    pub label: String,
    pub action: MenuAction,
}

impl MenuButton {
    fn new(label: impl Into<String>, action: MenuAction) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }
}

/// A rendered menu: HTML message text plus button rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuPage {
    pub text: String,
    pub rows: Vec<Vec<MenuButton>>,
}

impl MenuPage {
    /// Whether any button on the page performs `action`.
    pub fn has_action(&self, action: &MenuAction) -> bool {
        self.rows.iter().flatten().any(|b| &b.action == action)
    }

    fn has_label(&self, label: &str) -> bool {
        self.rows.iter().flatten().any(|b| b.label == label)
    }

    pub fn has_next(&self) -> bool {
        self.has_label(NEXT_LABEL)
    }

    pub fn has_previous(&self) -> bool {
        self.has_label(PREVIOUS_LABEL)
    }
}

/// Bounds of `page` in a list of `total` items, clamped to the list.
fn page_bounds(total: usize, page: usize) -> (usize, usize) {
    let start = page.saturating_mul(PAGE_SIZE).min(total);
    let end = start.saturating_add(PAGE_SIZE).min(total);
    (start, end)
}

fn has_next_page(total: usize, page: usize) -> bool {
    page.saturating_add(1).saturating_mul(PAGE_SIZE) < total
}

fn nav_row(page: usize, total: usize, to_page: impl Fn(usize) -> MenuAction) -> Vec<MenuButton> {
    let mut nav = Vec::new();
    if page > 0 {
        nav.push(MenuButton::new(PREVIOUS_LABEL, to_page(page - 1)));
    }
    if has_next_page(total, page) {
        nav.push(MenuButton::new(NEXT_LABEL, to_page(page + 1)));
    }
    nav
}

/// Page `page` of the exam list.
///
/// A page past the end renders no exams and only a Previous button.
pub fn exams_page(exams: &[ExamCategory], page: usize) -> MenuPage {
    let (start, end) = page_bounds(exams.len(), page);

    let mut rows: Vec<Vec<MenuButton>> = exams[start..end]
        .iter()
        .enumerate()
        .map(|(offset, exam)| {
            vec![MenuButton::new(
                exam.title.clone(),
                MenuAction::papers(start + offset, &exam.title, 0),
            )]
        })
        .collect();

    let nav = nav_row(page, exams.len(), MenuAction::ExamsPage);
    if !nav.is_empty() {
        rows.push(nav);
    }

    MenuPage {
        text: "📝 Choose an exam:".to_string(),
        rows,
    }
}

/// Page `page` of the papers of the exam at `exam_index`.
///
/// Returns `None` if the index is out of range. Papers whose `metaId` does
/// not fit in callback data get no button.
pub fn papers_page(exams: &[ExamCategory], exam_index: usize, page: usize) -> Option<MenuPage> {
    let exam = exams.get(exam_index)?;
    let (start, end) = page_bounds(exam.papers.len(), page);

    let mut rows: Vec<Vec<MenuButton>> = exam.papers[start..end]
        .iter()
        .filter_map(|paper| {
            let action = MenuAction::Paper(paper.meta_id.clone());
            let len = action.encode().len();
            if len > CALLBACK_DATA_LIMIT {
                warn!(
                    exam = %exam.title,
                    meta_id = %paper.meta_id,
                    len,
                    "Paper id too long for callback data, skipping"
                );
                return None;
            }
            Some(vec![MenuButton::new(paper.title.clone(), action)])
        })
        .collect();

    rows.push(vec![MenuButton::new(BACK_LABEL, MenuAction::ExamsPage(0))]);

    let nav = nav_row(page, exam.papers.len(), |p| {
        MenuAction::papers(exam_index, &exam.title, p)
    });
    if !nav.is_empty() {
        rows.push(nav);
    }

    Some(MenuPage {
        text: format!("📚 Choose a paper for <b>{}</b>", html_escape(&exam.title)),
        rows,
    })
}

/// Resolve an exam reference against the current list.
pub fn resolve_exam(exams: &[ExamCategory], exam: &ExamRef) -> Option<usize> {
    match exam {
        ExamRef::Title(title) => find_exam(exams, title).map(|(index, _)| index),
        ExamRef::Index(index) => (*index < exams.len()).then_some(*index),
    }
}

/// Deep link that opens `meta_id` in the quiz player.
pub fn play_link(base_url: &str, meta_id: &str) -> String {
    format!(
        "{}/play?metaId={}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(meta_id)
    )
}
