//! Paginated PDF report: title, period label, movement table, summary block.

use std::path::Path;

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
    Rgb,
};
use rust_decimal::Decimal;
use tracing::info;

use super::{ensure_not_empty, truncate_cell};
use crate::core::services::LedgerSummary;
use crate::currency::format_amount;
use crate::domain::movement::DATE_FORMAT;
use crate::domain::Movement;
use crate::errors::{LedgerError, Result};
use crate::utils::commit_bytes;

const REPORT_TITLE: &str = "Financial Report";
const PAGE_WIDTH: f64 = 210.0;
const PAGE_HEIGHT: f64 = 297.0;
const MARGIN_LEFT: f64 = 15.0;
const TABLE_BOTTOM: f64 = 30.0;
const ROW_STEP: f64 = 6.0;

const DESCRIPTION_CELL_CHARS: usize = 30;
const CATEGORY_CELL_CHARS: usize = 20;

// Column origins in mm from the left edge.
const COL_DATE: f64 = MARGIN_LEFT;
const COL_KIND: f64 = 40.0;
const COL_AMOUNT: f64 = 62.0;
const COL_DESCRIPTION: f64 = 92.0;
const COL_CATEGORY: f64 = 162.0;

struct ReportWriter {
    doc: PdfDocumentReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    layer: PdfLayerReference,
    y: f64,
    page_no: usize,
}

impl ReportWriter {
    fn new() -> Result<Self> {
        let (doc, page, layer) =
            PdfDocument::new(REPORT_TITLE, Mm(PAGE_WIDTH as f32), Mm(PAGE_HEIGHT as f32), "report");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(pdf_error)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_error)?;
        let layer = doc.get_page(page).get_layer(layer);
        let mut writer = Self {
            doc,
            regular,
            bold,
            layer,
            y: PAGE_HEIGHT - 20.0,
            page_no: 1,
        };
        writer.footer();
        Ok(writer)
    }

    fn text(&mut self, value: &str, size: f64, x: f64, bold: bool) {
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.use_text(value, size as f32, Mm(x as f32), Mm(self.y as f32), font);
    }

    fn advance(&mut self, step: f64) {
        self.y -= step;
    }

    fn footer(&mut self) {
        self.layer.use_text(
            format!("Page {}", self.page_no),
            8.0,
            Mm((PAGE_WIDTH / 2.0 - 6.0) as f32),
            Mm(12.0_f32),
            &self.regular,
        );
    }

    fn new_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH as f32), Mm(PAGE_HEIGHT as f32), "report");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.page_no += 1;
        self.y = PAGE_HEIGHT - 20.0;
        self.footer();
    }

    /// Starts a new page when fewer than `needed` millimetres remain.
    fn ensure_room(&mut self, needed: f64) -> bool {
        if self.y - needed < TABLE_BOTTOM {
            self.new_page();
            return true;
        }
        false
    }

    fn column_header(&mut self) {
        self.text("Date", 10.0, COL_DATE, true);
        self.text("Kind", 10.0, COL_KIND, true);
        self.text("Amount", 10.0, COL_AMOUNT, true);
        self.text("Description", 10.0, COL_DESCRIPTION, true);
        self.text("Category", 10.0, COL_CATEGORY, true);
        self.advance(ROW_STEP + 1.0);
    }

    fn movement_row(&mut self, movement: &Movement) {
        if self.ensure_room(ROW_STEP) {
            self.column_header();
        }
        let date = movement.date.format(DATE_FORMAT).to_string();
        let amount = format_amount(movement.amount);
        let description = truncate_cell(&movement.description, DESCRIPTION_CELL_CHARS);
        let category = truncate_cell(&movement.category, CATEGORY_CELL_CHARS);
        self.text(&date, 9.0, COL_DATE, false);
        self.text(movement.kind.label(), 9.0, COL_KIND, false);
        self.text(&amount, 9.0, COL_AMOUNT, false);
        self.text(&description, 9.0, COL_DESCRIPTION, false);
        self.text(&category, 9.0, COL_CATEGORY, false);
        self.advance(ROW_STEP);
    }

    fn summary_block(&mut self, summary: &LedgerSummary) {
        self.ensure_room(ROW_STEP * 5.0);
        self.advance(ROW_STEP);
        self.text("Summary", 12.0, MARGIN_LEFT, true);
        self.advance(ROW_STEP + 1.0);
        self.text(
            &format!("Total income: {}", format_amount(summary.total_income)),
            10.0,
            MARGIN_LEFT,
            false,
        );
        self.advance(ROW_STEP);
        self.text(
            &format!("Total expense: {}", format_amount(summary.total_expense)),
            10.0,
            MARGIN_LEFT,
            false,
        );
        self.advance(ROW_STEP);
        // Negative balances are set apart by colour and weight, not value.
        self.layer.set_fill_color(balance_color(summary.balance));
        self.text(
            &format!("Balance: {}", format_amount(summary.balance)),
            11.0,
            MARGIN_LEFT,
            true,
        );
        self.layer
            .set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
    }

    fn finish(self) -> Result<Vec<u8>> {
        self.doc.save_to_bytes().map_err(pdf_error)
    }
}

fn balance_color(balance: Decimal) -> Color {
    if balance < Decimal::ZERO {
        Color::Rgb(Rgb::new(0.75, 0.10, 0.10, None))
    } else {
        Color::Rgb(Rgb::new(0.05, 0.42, 0.18, None))
    }
}

fn pdf_error(err: printpdf::Error) -> LedgerError {
    LedgerError::Export(format!("PDF encoding failed: {err}"))
}

/// Builds the printable document in memory. Fails when there is nothing to
/// report.
pub fn render_pdf(
    movements: &[Movement],
    summary: &LedgerSummary,
    period_label: &str,
) -> Result<Vec<u8>> {
    ensure_not_empty(movements)?;
    let mut writer = ReportWriter::new()?;
    writer.text(REPORT_TITLE, 16.0, MARGIN_LEFT, true);
    writer.advance(ROW_STEP + 3.0);
    writer.text(period_label, 11.0, MARGIN_LEFT, false);
    writer.advance(ROW_STEP + 3.0);
    writer.column_header();
    for movement in movements {
        writer.movement_row(movement);
    }
    writer.summary_block(summary);
    writer.finish()
}

/// Renders and commits the document. The destination is only replaced on a
/// fully successful write.
pub fn export_pdf(
    movements: &[Movement],
    summary: &LedgerSummary,
    period_label: &str,
    path: &Path,
) -> Result<()> {
    let bytes = render_pdf(movements, summary, period_label)?;
    commit_bytes(path, &bytes)
        .map_err(|err| LedgerError::Export(format!("cannot write `{}`: {err}", path.display())))?;
    info!(path = %path.display(), rows = movements.len(), "PDF exported");
    Ok(())
}
