//! HTML fragments written into the dashboard's containers.

use crate::dom::escape_html;
use crate::models::DetectionEvent;

pub const NO_DETECTIONS: &str = r#"<p class="text-gray-500">No detections yet.</p>"#;

pub const NO_DATA_ROW: &str =
    r#"<tr><td colspan="5" class="text-center py-4 text-gray-500">No data available.</td></tr>"#;

// ---

/// Alert card for the summary view's recent-alerts list.
pub fn alert_card(det: &DetectionEvent) -> String {
    format!(
        concat!(
            r#"<div class="p-3 rounded-lg border bg-orange-50 border-orange-200">"#,
            r#"<p class="font-semibold text-sm text-orange-800">FIRE ALERT - {}% Confidence</p>"#,
            r#"<p class="text-xs text-gray-600">{} at {}</p>"#,
            "</div>"
        ),
        det.confidence,
        escape_html(det.time_part()),
        escape_html(&det.gps),
    )
}

/// Row of the analytics table: date, time, confidence, location, status.
pub fn detection_row(det: &DetectionEvent) -> String {
    format!(
        concat!(
            r#"<tr class="border-b border-gray-100 text-sm">"#,
            r#"<td class="py-2 px-4">{}</td>"#,
            r#"<td class="py-2 px-4">{}</td>"#,
            r#"<td class="py-2 px-4 font-semibold text-orange-600">{}%</td>"#,
            r#"<td class="py-2 px-4">{}</td>"#,
            r#"<td class="py-2 px-4"><span class="px-2 py-1 text-xs font-semibold rounded-full bg-orange-100 text-orange-800">{}</span></td>"#,
            "</tr>"
        ),
        escape_html(det.date_part()),
        escape_html(det.time_part()),
        det.confidence,
        escape_html(&det.gps),
        escape_html(&det.status),
    )
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    fn event(confidence: f64, gps: &str) -> DetectionEvent {
        // ---
        DetectionEvent {
            time: "2024-05-01 10:15:30".to_string(),
            confidence,
            gps: gps.to_string(),
            status: "Active".to_string(),
        }
    }

    #[test]
    fn test_alert_card_shows_confidence_and_location() {
        // ---
        let card = alert_card(&event(100.0, "26.4567°N, 88.4567°E"));
        assert!(card.contains("FIRE ALERT - 100% Confidence"));
        assert!(card.contains("10:15:30 at 26.4567°N, 88.4567°E"));
    }

    #[test]
    fn test_row_escapes_payload_text() {
        // ---
        let row = detection_row(&event(87.5, "<script>"));
        assert!(row.contains(">2024-05-01</td>"));
        assert!(row.contains(">87.5%</td>"));
        assert!(row.contains("&lt;script&gt;"));
        assert!(!row.contains("<script>"));
    }
}
