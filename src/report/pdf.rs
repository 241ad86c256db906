//! PDF encoding of a computed report layout.
//!
//! One content stream per page, two built-in Type1 fonts (Helvetica and
//! Helvetica-Bold). Layout coordinates are top-down; content streams use
//! bottom-up page coordinates, so every y is flipped here.

use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str};

use super::layout::{FontStyle, Layout, Page, PAGE_HEIGHT, PAGE_WIDTH};

const FONT_REGULAR: Name<'static> = Name(b"F1");
const FONT_BOLD: Name<'static> = Name(b"F2");

/// Fraction of the font size between the top of a text line and its
/// baseline.
const BASELINE_RATIO: f32 = 0.8;

pub fn render(layout: &Layout) -> Vec<u8> {
    let catalog_id = Ref::new(1);
    let page_tree_id = Ref::new(2);
    let regular_id = Ref::new(3);
    let bold_id = Ref::new(4);
    let mut next_id = 5;
    let mut bump = || {
        let id = Ref::new(next_id);
        next_id += 1;
        id
    };

    let mut pdf = Pdf::new();
    let mut page_ids = Vec::with_capacity(layout.pages.len());

    for page in &layout.pages {
        let page_id = bump();
        let content_id = bump();
        page_ids.push(page_id);

        let mut writer = pdf.page(page_id);
        writer.media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT));
        writer.parent(page_tree_id);
        writer.contents(content_id);
        {
            let mut resources = writer.resources();
            let mut fonts = resources.fonts();
            fonts.pair(FONT_REGULAR, regular_id);
            fonts.pair(FONT_BOLD, bold_id);
        }
        writer.finish();

        pdf.stream(content_id, &encode_page(page));
    }

    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id)
        .kids(page_ids.iter().copied())
        .count(layout.pages.len() as i32);
    pdf.type1_font(regular_id).base_font(Name(b"Helvetica"));
    pdf.type1_font(bold_id).base_font(Name(b"Helvetica-Bold"));

    pdf.finish()
}

fn encode_page(page: &Page) -> Vec<u8> {
    let mut content = Content::new();

    for fill in &page.fills {
        content.set_fill_rgb(1.0, 1.0, 1.0);
        content.rect(fill.x, flip(fill.y + fill.h), fill.w, fill.h);
        content.fill_nonzero();
    }

    for frame in &page.frames {
        content.set_stroke_gray(0.0);
        content.set_line_width(frame.width);
        content.rect(frame.x, flip(frame.y + frame.h), frame.w, frame.h);
        content.stroke();
    }

    for rule in &page.rules {
        content.set_stroke_gray(0.0);
        content.set_line_width(rule.width);
        content.move_to(rule.x1, flip(rule.y1));
        content.line_to(rule.x2, flip(rule.y2));
        content.stroke();
    }

    for text in &page.texts {
        let font = match text.style {
            FontStyle::Regular => FONT_REGULAR,
            FontStyle::Bold => FONT_BOLD,
        };
        content.begin_text();
        content.set_fill_gray(text.shade);
        content.set_font(font, text.size);
        content.next_line(text.x, flip(text.y + text.size * BASELINE_RATIO));
        content.show(Str(text.content.as_bytes()));
        content.end_text();
    }

    content.finish().to_vec()
}

/// Convert a top-down layout coordinate to bottom-up page space.
fn flip(y: f32) -> f32 {
    PAGE_HEIGHT - y
}
