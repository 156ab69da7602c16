//! Thai-labelled text rendering for records and request previews.

use rd_vat::{CanonicalRecord, KeyNormalizer, Node};
use serde_json::Value;

const RULE_WIDTH: usize = 80;

/// Frame content with a titled box.
pub fn boxed(title: &str, content: &str) -> String {
    let rule = "─".repeat(RULE_WIDTH);
    format!("┌{rule}┐\n│ {title}\n├{rule}┤\n{content}\n└{rule}┘")
}

/// Flatten an envelope to one line, truncated to `max_len` characters.
pub fn format_request_preview(xml: &str, max_len: usize) -> String {
    boxed("SOAP Request (Preview)", &truncate(&xml.trim().replace('\n', ""), max_len))
}

/// Cut `text` to `max_len` characters, marking the cut.
pub fn truncate(text: &str, max_len: usize) -> String {
    match text.char_indices().nth(max_len) {
        Some((idx, _)) => format!("{}...(truncated)", &text[..idx]),
        None => text.to_string(),
    }
}

/// One `label: value` line per canonical field.
pub fn format_record_th(record: &CanonicalRecord) -> String {
    record
        .iter()
        .map(|(field, value)| format!("{}: {value}", field.label_th()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Box title for record `index` (1-based) of `total`.
pub fn record_title(prefix: &str, index: usize, total: usize) -> String {
    if total > 1 {
        format!("{prefix} {index}/{total}")
    } else {
        prefix.to_string()
    }
}

/// Render every record as a numbered box.
pub fn format_records(prefix: &str, records: &[CanonicalRecord]) -> Vec<String> {
    let total = records.len();
    records
        .iter()
        .enumerate()
        .map(|(i, rec)| boxed(&record_title(prefix, i + 1, total), &format_record_th(rec)))
        .collect()
}

/// Normalize records supplied as arbitrary JSON objects.
///
/// Accepts canonical, `v`-prefixed, or snake_case keys; non-objects are skipped.
pub fn records_from_json(data: &[Value], normalizer: &KeyNormalizer<'_>) -> Vec<CanonicalRecord> {
    data.iter()
        .filter_map(|v| match Node::from(v.clone()) {
            Node::Map(map) => Some(normalizer.normalize(&map)),
            _ => None,
        })
        .collect()
}

/// Emit records to the log, one box each.
pub fn log_records(records: &[CanonicalRecord]) {
    if records.is_empty() {
        tracing::info!("ไม่มีข้อมูลผลลัพธ์จาก RD (records ว่าง)");
        return;
    }
    tracing::info!(count = records.len(), "VAT service returned records");
    for block in format_records("SOAP Response (Record)", records) {
        tracing::debug!("\n{block}");
    }
}
