//! Excel生成（共通ライブラリ）
//!
//! Report を3シート（Summary / Probabilities / Effect sizes）のブックにする。

use crate::summary::Report;
use crate::types::{Direction, Language};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook};

const SUMMARY_SHEET: &str = "Summary";
const PROBABILITY_SHEET: &str = "Probabilities";
const EFFECT_SHEET: &str = "Effect sizes";

/// Excelをバッファに生成
pub fn generate_report_workbook(report: &Report) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();

    // フォーマット定義
    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0x333333))
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xAAAAAA));

    let percent_format = Format::new()
        .set_num_format("0.0%")
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xCCCCCC));

    let number_format = Format::new()
        .set_num_format("0.00")
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xCCCCCC));

    let text_format = Format::new()
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xCCCCCC));

    // Summary
    {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SUMMARY_SHEET)
            .map_err(|e| format!("シート名設定エラー: {}", e))?;

        let headers = [
            "System",
            "Errors",
            "Total",
            "Bias rate",
            "Reduction factor",
            "Dominant pivot",
            "English probability",
        ];
        for (col, header) in headers.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *header, &header_format)
                .map_err(|e| format!("ヘッダー書き込みエラー: {}", e))?;
            worksheet.set_column_width(col as u16, 20)
                .map_err(|e| format!("列幅設定エラー: {}", e))?;
        }

        for (i, summary) in report.systems.iter().enumerate() {
            let row = i as u32 + 1;
            worksheet.write_string_with_format(row, 0, summary.system.to_string(), &text_format)
                .map_err(|e| format!("値書き込みエラー: {}", e))?;
            worksheet.write_number_with_format(row, 1, summary.bias.errors, &text_format)
                .map_err(|e| format!("値書き込みエラー: {}", e))?;
            worksheet.write_number_with_format(row, 2, summary.bias.total, &text_format)
                .map_err(|e| format!("値書き込みエラー: {}", e))?;
            worksheet.write_number_with_format(row, 3, summary.bias_rate, &percent_format)
                .map_err(|e| format!("値書き込みエラー: {}", e))?;
            let written = match summary.reduction_factor {
                Some(factor) => worksheet.write_number_with_format(row, 4, factor, &number_format),
                None => worksheet.write_string_with_format(row, 4, "-", &text_format),
            };
            written.map_err(|e| format!("値書き込みエラー: {}", e))?;
            worksheet.write_string_with_format(row, 5, summary.dominant.name(), &text_format)
                .map_err(|e| format!("値書き込みエラー: {}", e))?;
            worksheet.write_number_with_format(
                row,
                6,
                summary.combined.probability(Language::English),
                &percent_format,
            )
            .map_err(|e| format!("値書き込みエラー: {}", e))?;
        }
    }

    // Probabilities: 言語 × (方向, システム)
    {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(PROBABILITY_SHEET)
            .map_err(|e| format!("シート名設定エラー: {}", e))?;

        worksheet.write_string_with_format(0, 0, "Language", &header_format)
            .map_err(|e| format!("ヘッダー書き込みエラー: {}", e))?;
        worksheet.set_column_width(0, 14)
            .map_err(|e| format!("列幅設定エラー: {}", e))?;
        for (i, language) in Language::ALL.iter().enumerate() {
            worksheet.write_string_with_format(i as u32 + 1, 0, language.name(), &text_format)
                .map_err(|e| format!("値書き込みエラー: {}", e))?;
        }

        let mut col: u16 = 1;
        for summary in &report.systems {
            let mut columns: Vec<(String, &crate::summary::Distribution)> = Direction::ALL
                .iter()
                .filter_map(|&d| {
                    summary
                        .direction(d)
                        .map(|dist| (format!("{} {}", d, summary.system.short_name()), dist))
                })
                .collect();
            columns.push((
                format!("Combined {}", summary.system.short_name()),
                &summary.combined,
            ));

            for (title, dist) in columns {
                worksheet.write_string_with_format(0, col, title, &header_format)
                    .map_err(|e| format!("ヘッダー書き込みエラー: {}", e))?;
                worksheet.set_column_width(col, 22)
                    .map_err(|e| format!("列幅設定エラー: {}", e))?;
                for (i, language) in Language::ALL.iter().enumerate() {
                    worksheet.write_number_with_format(
                        i as u32 + 1,
                        col,
                        dist.probability(*language),
                        &percent_format,
                    )
                    .map_err(|e| format!("値書き込みエラー: {}", e))?;
                }
                col += 1;
            }
        }

        worksheet.set_freeze_panes(1, 1)
            .map_err(|e| format!("ウィンドウ枠固定エラー: {}", e))?;
    }

    // Effect sizes
    {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(EFFECT_SHEET)
            .map_err(|e| format!("シート名設定エラー: {}", e))?;

        for (col, header) in ["System", "Versus", "Cohen's h", "Magnitude"].iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *header, &header_format)
                .map_err(|e| format!("ヘッダー書き込みエラー: {}", e))?;
            worksheet.set_column_width(col as u16, 20)
                .map_err(|e| format!("列幅設定エラー: {}", e))?;
        }

        let mut row: u32 = 1;
        for summary in &report.systems {
            for effect in &summary.effect_sizes {
                worksheet.write_string_with_format(row, 0, summary.system.to_string(), &text_format)
                    .map_err(|e| format!("値書き込みエラー: {}", e))?;
                worksheet.write_string_with_format(row, 1, effect.versus.to_string(), &text_format)
                    .map_err(|e| format!("値書き込みエラー: {}", e))?;
                worksheet.write_number_with_format(row, 2, effect.h, &number_format)
                    .map_err(|e| format!("値書き込みエラー: {}", e))?;
                worksheet.write_string_with_format(row, 3, effect.magnitude.label(), &text_format)
                    .map_err(|e| format!("値書き込みエラー: {}", e))?;
                row += 1;
            }
        }
    }

    // バッファに書き出し
    workbook.save_to_buffer()
        .map_err(|e| format!("Excel保存エラー: {}", e))
}
