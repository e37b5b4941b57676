use std::fs;
use std::path::Path;

use anyhow::Result;
use ethioscrape_core::collector::write_records;
use ethioscrape_core::table::{
    decode_tokens, finalize_table, preprocess_table, read_table, CLEANED_COLUMN,
    SENTENCES_COLUMN, WORDS_COLUMN,
};
use ethioscrape_core::MessageRecord;

fn record(channel: &str, message: &str, sender_id: Option<i64>) -> MessageRecord {
    MessageRecord {
        channel: channel.to_string(),
        date: "2025-06-22 11:18:37".to_string(),
        sender_id,
        message: message.to_string(),
    }
}

fn write_raw(path: &Path) -> Result<()> {
    let records = [
        record("@shop", "Hello ሰላም https://x.co 123", Some(11)),
        record("@shop", "", None),
        record("@news", "ሠላም ለዐለም ሁሉ። 🔥 Breaking!", Some(12)),
        record("@news", "only latin text", Some(13)),
    ];
    let refs: Vec<&MessageRecord> = records.iter().collect();
    write_records(path, &refs)?;
    Ok(())
}

#[test]
fn interim_table_keeps_rows_and_raw_column() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let raw = dir.path().join("raw/telegram_messages_20250622_111837.csv");
    let interim = dir.path().join("interim/tokenized_message.csv");
    write_raw(&raw)?;

    let report = preprocess_table(&raw, &interim, "message")?;

    assert_eq!(report.rows, 4);
    assert_eq!(
        report.columns,
        vec![
            "channel",
            "date",
            "sender_id",
            "message",
            CLEANED_COLUMN,
            SENTENCES_COLUMN,
            WORDS_COLUMN
        ]
    );

    let df = read_table(&interim)?;
    assert_eq!(df.height(), 4);

    let channels = df.column("channel")?.str()?;
    let order: Vec<&str> = channels.into_iter().flatten().collect();
    assert_eq!(order, vec!["@shop", "@shop", "@news", "@news"]);

    let cleaned = df.column(CLEANED_COLUMN)?.str()?;
    assert_eq!(cleaned.get(0), Some("ሰላም"));
    assert_eq!(cleaned.get(2), Some("ሰላም ለአለም"));

    let words = df.column(WORDS_COLUMN)?.str()?;
    assert_eq!(decode_tokens(words.get(0).unwrap_or_default())?, vec!["ሰላም"]);
    assert!(decode_tokens(words.get(3).unwrap_or_default())?.is_empty());

    let sentences = df.column(SENTENCES_COLUMN)?.str()?;
    assert!(decode_tokens(sentences.get(1).unwrap_or_default())?.is_empty());
    Ok(())
}

#[test]
fn processed_table_drops_raw_column_and_is_repeatable() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let raw = dir.path().join("raw.csv");
    let interim = dir.path().join("interim/tokenized_message.csv");
    let processed_dir = dir.path().join("processed");
    write_raw(&raw)?;

    let interim_report = preprocess_table(&raw, &interim, "message")?;
    let first = finalize_table(&interim, &processed_dir, "tokenized_message_processed.csv", "message")?;

    let expected: Vec<String> = interim_report
        .columns
        .iter()
        .filter(|name| name.as_str() != "message")
        .cloned()
        .collect();
    assert_eq!(first.columns, expected);
    assert_eq!(first.rows, interim_report.rows);

    // the interim artifact is left untouched
    assert!(read_table(&interim)?.column("message").is_ok());

    let first_bytes = fs::read(&first.path)?;
    let second = finalize_table(&interim, &processed_dir, "tokenized_message_processed.csv", "message")?;
    assert_eq!(fs::read(&second.path)?, first_bytes);

    // redacting an already redacted table is a no-op
    let again = finalize_table(&second.path, &processed_dir, "again.csv", "message")?;
    assert_eq!(again.columns, first.columns);
    assert_eq!(fs::read(&again.path)?, first_bytes);
    Ok(())
}

#[test]
fn missing_text_column_is_an_error() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let raw = dir.path().join("raw.csv");
    write_raw(&raw)?;

    let result = preprocess_table(&raw, &dir.path().join("interim.csv"), "text");
    assert!(result.is_err());
    assert!(!dir.path().join("interim.csv").exists());
    Ok(())
}

#[test]
fn numeric_only_messages_do_not_fix_the_text_column_type() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let raw = dir.path().join("raw.csv");
    let interim = dir.path().join("interim.csv");

    let mut records: Vec<MessageRecord> = (0..120)
        .map(|i| record("@prices", &(500 + i).to_string(), Some(i)))
        .collect();
    records.push(record("@prices", "ዋጋ ሰላም", Some(120)));
    let refs: Vec<&MessageRecord> = records.iter().collect();
    write_records(&raw, &refs)?;

    let report = preprocess_table(&raw, &interim, "message")?;
    assert_eq!(report.rows, 121);

    let df = read_table(&interim)?;
    let message = df.column("message")?.str()?;
    assert_eq!(message.get(0), Some("500"));
    assert_eq!(message.get(120), Some("ዋጋ ሰላም"));

    let cleaned = df.column(CLEANED_COLUMN)?.str()?;
    assert!(cleaned.get(0).unwrap_or_default().is_empty());
    assert_eq!(cleaned.get(120), Some("ዋጋ ሰላም"));
    Ok(())
}
