//! Pure layout engine for the task report.
//!
//! Produces a device-independent description of every page: white cell
//! bands, border frames, rules, and positioned text. Coordinates are PDF
//! points with the y axis growing downward from the top of the page; the
//! encoder flips them when writing content streams. Keeping this stage free
//! of PDF concerns makes layout decisions (truncation, positions, page
//! breaks) directly testable.

use crate::task::Task;

pub const PAGE_WIDTH: f32 = 612.0;
pub const PAGE_HEIGHT: f32 = 792.0;
pub const MARGIN: f32 = 50.0;

pub const TABLE_X: f32 = 50.0;
pub const TABLE_WIDTH: f32 = 500.0;
pub const COL_WIDTHS: [f32; 4] = [40.0, 180.0, 180.0, 100.0];
pub const ROW_HEIGHT: f32 = 35.0;

/// Cursor threshold past which the completed table starts on a new page.
pub const PAGE_BREAK_Y: f32 = 700.0;
/// Vertical gap between the two tables.
pub const TABLE_GAP: f32 = 20.0;

pub const TITLE_MAX_CHARS: usize = 35;
pub const DESCRIPTION_MAX_CHARS: usize = 40;

const TITLE_SIZE: f32 = 24.0;
const SUMMARY_SIZE: f32 = 12.0;
const TABLE_TITLE_SIZE: f32 = 14.0;
const HEADER_SIZE: f32 = 11.0;
const CELL_SIZE: f32 = 9.0;
const EMPTY_MARKER_SIZE: f32 = 14.0;

const CELL_PAD: f32 = 5.0;
const CELL_TEXT_INSET: f32 = 10.0;
const LINE_GAP: f32 = 14.0;
const SUMMARY_SHADE: f32 = 0.4;

const HEADERS: [&str; 4] = ["#", "Title", "Description", "Priority"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
}

/// A positioned run of text. `y` is the top of the text line; `shade` is a
/// gray level with 0.0 black.
#[derive(Debug, Clone)]
pub struct Text {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub style: FontStyle,
    pub shade: f32,
    pub content: String,
}

/// A stroked line segment.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub width: f32,
}

/// A stroked rectangle outline.
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub width: f32,
}

/// A white-filled rectangle.
#[derive(Debug, Clone, Copy)]
pub struct Fill {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

#[derive(Debug, Default, Clone)]
pub struct Page {
    pub fills: Vec<Fill>,
    pub frames: Vec<Frame>,
    pub rules: Vec<Rule>,
    pub texts: Vec<Text>,
}

#[derive(Debug, Clone)]
pub struct Layout {
    pub pages: Vec<Page>,
}

/// Lay out the full report for `tasks`, delivered newest-first.
pub fn lay_out(tasks: &[Task]) -> Layout {
    let incomplete: Vec<&Task> = tasks.iter().filter(|t| !t.completed).collect();
    let completed: Vec<&Task> = tasks.iter().filter(|t| t.completed).collect();

    let mut doc = DocBuilder::new();
    doc.centered_line("My To-Do List", TITLE_SIZE, FontStyle::Bold, 0.0);
    let summary = format!(
        "Total: {} | Completed: {} | Incomplete: {}",
        tasks.len(),
        completed.len(),
        incomplete.len()
    );
    doc.centered_line(&summary, SUMMARY_SIZE, FontStyle::Regular, SUMMARY_SHADE);

    if tasks.is_empty() {
        doc.centered_line("No todos found.", EMPTY_MARKER_SIZE, FontStyle::Regular, 0.0);
        return doc.finish();
    }

    if !incomplete.is_empty() {
        doc.table("Incomplete Tasks", &rows(&incomplete));
        doc.cursor += TABLE_GAP;
    }

    if !completed.is_empty() {
        if doc.cursor > PAGE_BREAK_Y {
            doc.new_page();
        }
        doc.table("Completed Tasks", &rows(&completed));
    }

    doc.finish()
}

fn rows(tasks: &[&Task]) -> Vec<[String; 4]> {
    tasks
        .iter()
        .enumerate()
        .map(|(i, task)| task_row(i + 1, task))
        .collect()
}

/// Render one task as table cells. `index` is 1-based within its table.
fn task_row(index: usize, task: &Task) -> [String; 4] {
    let description = task
        .description
        .as_deref()
        .map(|d| truncate(d, DESCRIPTION_MAX_CHARS))
        .unwrap_or_else(|| "-".to_string());
    [
        index.to_string(),
        truncate(&task.title, TITLE_MAX_CHARS),
        description,
        task.priority.as_str().to_uppercase(),
    ]
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

/// Coarse Helvetica width estimate, good enough for centering headings.
fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.5
}

struct DocBuilder {
    done: Vec<Page>,
    page: Page,
    cursor: f32,
}

impl DocBuilder {
    fn new() -> Self {
        Self {
            done: Vec::new(),
            page: Page::default(),
            cursor: MARGIN,
        }
    }

    fn new_page(&mut self) {
        self.done.push(std::mem::take(&mut self.page));
        self.cursor = MARGIN;
    }

    fn finish(mut self) -> Layout {
        self.done.push(self.page);
        Layout { pages: self.done }
    }

    /// A line of text centered across the page, advancing the cursor.
    fn centered_line(&mut self, content: &str, size: f32, style: FontStyle, shade: f32) {
        let x = (PAGE_WIDTH - text_width(content, size)) / 2.0;
        self.page.texts.push(Text {
            x,
            y: self.cursor,
            size,
            style,
            shade,
            content: content.to_string(),
        });
        self.cursor += size + LINE_GAP;
    }

    /// One table at the current cursor: a borderless centered title band, a
    /// rule, a bordered header row, then one bordered row per entry.
    fn table(&mut self, title: &str, rows: &[[String; 4]]) {
        self.page.fills.push(Fill {
            x: TABLE_X,
            y: self.cursor,
            w: TABLE_WIDTH,
            h: ROW_HEIGHT,
        });
        let x = TABLE_X + (TABLE_WIDTH - text_width(title, TABLE_TITLE_SIZE)) / 2.0;
        self.page.texts.push(Text {
            x,
            y: self.cursor + CELL_TEXT_INSET,
            size: TABLE_TITLE_SIZE,
            style: FontStyle::Bold,
            shade: 0.0,
            content: title.to_string(),
        });
        self.cursor += ROW_HEIGHT;

        self.page.rules.push(Rule {
            x1: TABLE_X,
            y1: self.cursor,
            x2: TABLE_X + TABLE_WIDTH,
            y2: self.cursor,
            width: 1.0,
        });

        self.cell_row(&HEADERS.map(String::from), HEADER_SIZE, FontStyle::Bold, 1.0);
        for row in rows {
            self.cell_row(row, CELL_SIZE, FontStyle::Regular, 0.5);
        }
    }

    fn cell_row(
        &mut self,
        cells: &[String; 4],
        size: f32,
        style: FontStyle,
        divider_width: f32,
    ) {
        let y = self.cursor;
        self.page.fills.push(Fill {
            x: TABLE_X,
            y,
            w: TABLE_WIDTH,
            h: ROW_HEIGHT,
        });
        self.page.frames.push(Frame {
            x: TABLE_X,
            y,
            w: TABLE_WIDTH,
            h: ROW_HEIGHT,
            width: 1.0,
        });

        let mut x = TABLE_X;
        for (i, cell) in cells.iter().enumerate() {
            self.page.texts.push(Text {
                x: x + CELL_PAD,
                y: y + CELL_TEXT_INSET,
                size,
                style,
                shade: 0.0,
                content: cell.clone(),
            });
            x += COL_WIDTHS[i];
            if i < cells.len() - 1 {
                self.page.rules.push(Rule {
                    x1: x,
                    y1: y,
                    x2: x,
                    y2: y + ROW_HEIGHT,
                    width: divider_width,
                });
            }
        }

        self.cursor += ROW_HEIGHT;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Priority;
    use chrono::{Duration, TimeZone, Utc};
    use uuid::Uuid;

    fn task(title: &str, description: Option<&str>, completed: bool, order: i64) -> Task {
        Task {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: description.map(str::to_string),
            priority: Priority::Medium,
            completed,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                + Duration::seconds(order),
        }
    }

    fn page_text_contents(page: &Page) -> Vec<&str> {
        page.texts.iter().map(|t| t.content.as_str()).collect()
    }

    /// Contents of the index column (first data column) in layout order.
    fn index_cells(page: &Page) -> Vec<&str> {
        page.texts
            .iter()
            .filter(|t| t.size == CELL_SIZE && t.x == TABLE_X + CELL_PAD)
            .map(|t| t.content.as_str())
            .collect()
    }

    #[test]
    fn empty_input_renders_marker_and_no_tables() {
        let layout = lay_out(&[]);

        assert_eq!(layout.pages.len(), 1);
        let texts = page_text_contents(&layout.pages[0]);
        assert!(texts.contains(&"No todos found."));
        assert!(texts.contains(&"Total: 0 | Completed: 0 | Incomplete: 0"));
        assert!(!texts.contains(&"Incomplete Tasks"));
        assert!(!texts.contains(&"Completed Tasks"));
        assert!(layout.pages[0].frames.is_empty());
    }

    #[test]
    fn two_tables_with_independent_row_indices() {
        let tasks = vec![
            task("a", None, false, 5),
            task("b", None, false, 4),
            task("c", None, true, 3),
            task("d", None, true, 2),
            task("e", None, true, 1),
        ];

        let layout = lay_out(&tasks);
        assert_eq!(layout.pages.len(), 1);
        let page = &layout.pages[0];

        let texts = page_text_contents(page);
        assert!(texts.contains(&"Incomplete Tasks"));
        assert!(texts.contains(&"Completed Tasks"));
        assert!(texts.contains(&"Total: 5 | Completed: 3 | Incomplete: 2"));

        // Header + data frames: (1 + 2) for incomplete, (1 + 3) for completed.
        assert_eq!(page.frames.len(), 7);
        assert_eq!(index_cells(page), ["1", "2", "1", "2", "3"]);
    }

    #[test]
    fn long_title_and_description_are_truncated() {
        let long_title = "t".repeat(36);
        let long_description = "d".repeat(50);
        let tasks = vec![task(&long_title, Some(&long_description), false, 0)];

        let layout = lay_out(&tasks);
        let texts = page_text_contents(&layout.pages[0]);

        let expected_title = format!("{}...", "t".repeat(35));
        let expected_description = format!("{}...", "d".repeat(40));
        assert!(texts.contains(&expected_title.as_str()));
        assert!(texts.contains(&expected_description.as_str()));
    }

    #[test]
    fn exact_limit_text_is_not_truncated() {
        let title = "t".repeat(35);
        let tasks = vec![task(&title, None, false, 0)];

        let layout = lay_out(&tasks);
        let texts = page_text_contents(&layout.pages[0]);
        assert!(texts.contains(&title.as_str()));
    }

    #[test]
    fn missing_description_renders_dash_and_priority_uppercases() {
        let tasks = vec![task("a", None, false, 0)];
        let layout = lay_out(&tasks);
        let texts = page_text_contents(&layout.pages[0]);
        assert!(texts.contains(&"-"));
        assert!(texts.contains(&"MEDIUM"));
    }

    #[test]
    fn completed_table_breaks_to_a_new_page_when_past_threshold() {
        // 15 incomplete rows leave the cursor past 700 once the table gap is
        // added, so the completed table must start on a fresh page.
        let mut tasks: Vec<Task> = (0..15)
            .map(|i| task(&format!("open {i}"), None, false, 100 - i))
            .collect();
        tasks.push(task("done", None, true, 0));

        let layout = lay_out(&tasks);
        assert_eq!(layout.pages.len(), 2);

        let second = &layout.pages[1];
        let completed_title = second
            .texts
            .iter()
            .find(|t| t.content == "Completed Tasks")
            .expect("completed table on second page");
        assert_eq!(completed_title.y, MARGIN + CELL_TEXT_INSET);
        assert_eq!(index_cells(second), ["1"]);
    }

    #[test]
    fn completed_table_stays_on_page_under_threshold() {
        let mut tasks: Vec<Task> = (0..14)
            .map(|i| task(&format!("open {i}"), None, false, 100 - i))
            .collect();
        tasks.push(task("done", None, true, 0));

        let layout = lay_out(&tasks);
        assert_eq!(layout.pages.len(), 1);
    }

    #[test]
    fn layout_is_deterministic() {
        let tasks = vec![
            task("a", Some("one"), false, 2),
            task("b", None, true, 1),
        ];

        let first = lay_out(&tasks);
        let second = lay_out(&tasks);

        assert_eq!(first.pages.len(), second.pages.len());
        for (p1, p2) in first.pages.iter().zip(&second.pages) {
            assert_eq!(p1.texts.len(), p2.texts.len());
            for (t1, t2) in p1.texts.iter().zip(&p2.texts) {
                assert_eq!(t1.content, t2.content);
                assert_eq!(t1.x, t2.x);
                assert_eq!(t1.y, t2.y);
            }
        }
    }
}
