use crate::error::Result;
use crate::models::application::ApplicationStatus;
use crate::services::ranking_service::JobRanking;
use rust_xlsxwriter::*;

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub struct ExportService;

impl ExportService {
    fn status_color(status: ApplicationStatus) -> Color {
        match status {
            ApplicationStatus::Applied | ApplicationStatus::Pending => Color::RGB(0x3B82F6),
            ApplicationStatus::Shortlisted | ApplicationStatus::InterviewScheduled => {
                Color::RGB(0x8B5CF6)
            }
            ApplicationStatus::Interviewed | ApplicationStatus::Offered => Color::RGB(0xF59E0B),
            ApplicationStatus::Hired => Color::RGB(0x10B981),
            ApplicationStatus::Rejected => Color::RGB(0xEF4444),
        }
    }

    fn score_color(score: i32) -> Color {
        if score >= 70 {
            Color::RGB(0x10B981)
        } else if score >= 40 {
            Color::RGB(0xF59E0B)
        } else {
            Color::RGB(0xEF4444)
        }
    }

    fn optional_score(value: Option<f64>) -> String {
        value.map(|v| format!("{:.1}", v)).unwrap_or_else(|| "-".to_string())
    }

    /// One sheet listing the job's ranking in order.
    pub fn generate_ranking_xlsx(ranking: &JobRanking) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Ranking")?;

        let header_bg = Color::RGB(0x0F172A);
        let border_color = Color::RGB(0xE2E8F0);

        let columns = [
            ("Rank", 8.0),
            ("Candidate", 30.0),
            ("Email", 30.0),
            ("Status", 20.0),
            ("Ranking score", 15.0),
            ("AI score", 12.0),
            ("Manual score", 14.0),
            ("Applied at", 22.0),
        ];

        for (i, (_, width)) in columns.iter().enumerate() {
            worksheet.set_column_width(i as u16, *width)?;
        }

        let title_format = Format::new().set_bold().set_font_size(14);
        worksheet.write_string_with_format(
            0,
            0,
            format!(
                "{} (AI weight {:.2}, manual weight {:.2})",
                ranking.job_title,
                ranking.weights.ai(),
                ranking.weights.manual()
            ),
            &title_format,
        )?;

        let header_format = Format::new()
            .set_bold()
            .set_font_color(Color::White)
            .set_background_color(header_bg)
            .set_border(FormatBorder::Thin)
            .set_border_color(border_color);
        let header_row = 2;
        for (i, (name, _)) in columns.iter().enumerate() {
            worksheet.write_string_with_format(header_row, i as u16, *name, &header_format)?;
        }

        let cell = Format::new()
            .set_border(FormatBorder::Thin)
            .set_border_color(border_color);

        for (offset, item) in ranking.items.iter().enumerate() {
            let row = header_row + 1 + offset as u32;
            let application = &item.application;
            let (name, email) = application
                .candidate
                .as_ref()
                .map(|c| (c.name.as_str(), c.email.as_str()))
                .unwrap_or(("", ""));

            worksheet.write_number_with_format(row, 0, item.rank as f64, &cell)?;
            worksheet.write_string_with_format(row, 1, name, &cell)?;
            worksheet.write_string_with_format(row, 2, email, &cell)?;
            worksheet.write_string_with_format(
                row,
                3,
                application.status.as_str(),
                &cell.clone().set_font_color(Self::status_color(application.status)),
            )?;
            worksheet.write_number_with_format(
                row,
                4,
                f64::from(application.ranking_score),
                &cell
                    .clone()
                    .set_bold()
                    .set_font_color(Self::score_color(application.ranking_score)),
            )?;
            worksheet.write_string_with_format(
                row,
                5,
                Self::optional_score(application.score_breakdown.ai_score),
                &cell,
            )?;
            worksheet.write_string_with_format(
                row,
                6,
                Self::optional_score(application.score_breakdown.manual_score),
                &cell,
            )?;
            worksheet.write_string_with_format(
                row,
                7,
                application.applied_at.format("%Y-%m-%d %H:%M").to_string(),
                &cell,
            )?;
        }

        worksheet.set_freeze_panes(header_row + 1, 0)?;

        let buffer = workbook.save_to_buffer()?;
        Ok(buffer)
    }
}
