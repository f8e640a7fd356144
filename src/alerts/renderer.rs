use std::fmt::Write as _;

use crate::models::QualityLevel;
use crate::readers::SnapshotTable;
use crate::utils::constants::*;

/// Snapshot columns shown in the alert table, with their headings
const DISPLAY_COLUMNS: &[(&str, &str)] = &[
    (COL_STATION, "Estación"),
    (COL_MUNICIPALITY, "Municipio"),
    (COL_POLLUTANT, "Contaminante"),
    (COL_CONCENTRATION, "Valor índice (Concentración)"),
    (COL_QUALITY, "Calidad (semáforo)"),
    (COL_RISK, "Riesgo"),
    (COL_DATE, "Fecha / hora"),
    (COL_REPORT_URL, "Reporte detalle"),
];

const NEUTRAL_BADGE: (&str, &str) = ("⚪", "#757575");

const CELL_STYLE: &str = "border:1px solid #ddd;padding:6px 10px;text-align:center;";
const HEADER_STYLE: &str = "border:1px solid #ddd;padding:6px 10px;background:#f5f5f5;";

pub const ALERT_SUBJECT: &str = "⚠ Alertas de Calidad del Aire - Estaciones en Riesgo";

/// Coloured pill for a quality label; unknown labels get a grey badge
pub fn quality_badge(label: &str) -> String {
    let (emoji, color) = label
        .parse::<QualityLevel>()
        .map(|level| level.badge())
        .unwrap_or(NEUTRAL_BADGE);

    format!(
        "<span style=\"background-color:{};color:white;padding:3px 8px;border-radius:12px;\
         font-size:12px;font-weight:bold;display:inline-block;min-width:110px;\
         text-align:center;\">{} {}</span>",
        color,
        emoji,
        escape_html(label)
    )
}

/// Renders alert rows of a snapshot into an HTML email body
pub struct AlertRenderer {
    source_name: String,
}

impl AlertRenderer {
    /// `source_name` is shown in the footer as the originating file
    pub fn new(source_name: &str) -> Self {
        Self {
            source_name: source_name.to_string(),
        }
    }

    /// Display columns present in `table`, in display order
    fn present_columns(&self, table: &SnapshotTable) -> Vec<(usize, &'static str, &'static str)> {
        DISPLAY_COLUMNS
            .iter()
            .filter_map(|&(name, heading)| table.column(name).map(|i| (i, name, heading)))
            .collect()
    }

    fn render_cell(&self, column: &str, value: &str) -> String {
        match column {
            COL_QUALITY => quality_badge(value),
            COL_REPORT_URL if !value.trim().is_empty() => format!(
                "<a href='{}' target='_blank'>Ver reporte</a>",
                escape_html(value.trim())
            ),
            _ => escape_html(value),
        }
    }

    pub fn render_table(&self, table: &SnapshotTable) -> String {
        let columns = self.present_columns(table);
        let mut html = String::new();

        let _ = writeln!(
            html,
            "<table style=\"border-collapse:collapse;width:100%;max-width:900px;margin-top:10px;\">"
        );

        html.push_str("  <thead><tr>");
        for (_, _, heading) in &columns {
            let _ = write!(html, "<th style='{}'>{}</th>", HEADER_STYLE, heading);
        }
        html.push_str("</tr></thead>\n  <tbody>\n");

        for row in &table.rows {
            html.push_str("    <tr>");
            for &(index, name, _) in &columns {
                let value = row.get(index).map(String::as_str).unwrap_or_default();
                let _ = write!(
                    html,
                    "<td style='{}'>{}</td>",
                    CELL_STYLE,
                    self.render_cell(name, value)
                );
            }
            html.push_str("</tr>\n");
        }

        html.push_str("  </tbody>\n</table>\n");
        html
    }

    pub fn render_document(&self, table: &SnapshotTable) -> String {
        let mut html = String::new();

        let _ = writeln!(html, "<html>");
        let _ = writeln!(
            html,
            "  <body style=\"font-family:Arial, sans-serif; font-size:14px; color:#333;\">"
        );
        let _ = writeln!(
            html,
            "    <h2 style=\"color:#d32f2f;\">⚠ Estaciones con calidad del aire crítica</h2>"
        );
        let _ = writeln!(
            html,
            "    <p>Se detectaron estaciones cuyo nivel de calidad del aire es \
             <b>Mala</b>, <b>Muy mala</b> o <b>Extremadamente mala</b>.</p>"
        );
        html.push_str(&self.render_table(table));
        let _ = writeln!(html, "    <br>");
        let _ = writeln!(
            html,
            "    <p style=\"font-size:12px;color:#777;\">Reporte generado automáticamente.<br>\
             Archivo base: <code>{}</code></p>",
            escape_html(&self.source_name)
        );
        let _ = writeln!(html, "  </body>");
        let _ = writeln!(html, "</html>");

        html
    }

    /// Plain-text alternative for clients that do not render HTML
    pub fn render_plain(&self, table: &SnapshotTable) -> String {
        let mut text = String::from("Estaciones con calidad del aire crítica:\n\n");

        for row in 0..table.len() {
            let cell = |name: &str| table.cell(row, name).unwrap_or_default();
            let _ = writeln!(
                text,
                "- {} ({}): {} / riesgo {} [{}]",
                cell(COL_STATION),
                cell(COL_MUNICIPALITY),
                cell(COL_QUALITY),
                cell(COL_RISK),
                cell(COL_DATE)
            );
        }

        let _ = writeln!(text, "\nArchivo base: {}", self.source_name);
        text
    }
}

/// Minimal HTML entity escaping for snapshot content
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> SnapshotTable {
        SnapshotTable {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn test_badge_colors() {
        assert!(quality_badge("Mala").contains("#fb8c00"));
        assert!(quality_badge("Mala").contains("🟠 Mala"));
        assert!(quality_badge("Extremadamente mala").contains("#8e24aa"));
        assert!(quality_badge("Desconocida").contains("#757575"));
        assert!(quality_badge("Desconocida").contains("⚪"));
    }

    #[test]
    fn test_table_uses_present_columns_in_display_order() {
        let snapshot = table(
            &["Date", "Calidad", "Estacion", "HrAveData"],
            &[&["2024-05-01 13:00:00", "Muy mala", "centro", "170"]],
        );

        let html = AlertRenderer::new("aire_monterrey.csv").render_table(&snapshot);

        let station = html.find("Estación").unwrap();
        let quality = html.find("Calidad (semáforo)").unwrap();
        let date = html.find("Fecha / hora").unwrap();
        assert!(station < quality && quality < date);
        assert!(!html.contains("Municipio"));
        assert!(!html.contains("170"));
        assert!(html.contains("#e53935"));
    }

    #[test]
    fn test_report_url_becomes_link() {
        let snapshot = table(
            &["Estacion", "Calidad", "url_reporte"],
            &[
                &["centro", "Mala", "https://aire.nl.gob.mx/r?estacion1=CENTRO"],
                &["movil", "Mala", ""],
            ],
        );

        let html = AlertRenderer::new("x.csv").render_table(&snapshot);

        assert_eq!(html.matches("Ver reporte").count(), 1);
        assert!(html.contains("<a href='https://aire.nl.gob.mx/r?estacion1=CENTRO'"));
    }

    #[test]
    fn test_cells_are_escaped() {
        let snapshot = table(&["Estacion", "Calidad"], &[&["<b>centro</b>", "Mala"]]);

        let html = AlertRenderer::new("x.csv").render_table(&snapshot);

        assert!(html.contains("&lt;b&gt;centro&lt;/b&gt;"));
    }

    #[test]
    fn test_document_names_source_file() {
        let snapshot = table(&["Estacion", "Calidad"], &[&["centro", "Mala"]]);
        let renderer = AlertRenderer::new("aire_monterrey.csv");

        let html = renderer.render_document(&snapshot);
        assert!(html.starts_with("<html>"));
        assert!(html.contains("<code>aire_monterrey.csv</code>"));

        let text = renderer.render_plain(&snapshot);
        assert!(text.contains("- centro (): Mala"));
    }
}
