use anyhow::Context;
use chipputt_core::MatchRecord;

pub const CSV_HEADER: [&str; 3] = ["Match ID", "Player", "Score"];

pub fn export_json(record: &MatchRecord) -> anyhow::Result<String> {
    serde_json::to_string_pretty(record).context("serialize match record")
}

/// One row per player per match, final totals only.
pub fn export_csv(records: &[MatchRecord]) -> anyhow::Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for record in records {
        for player in &record.players {
            let total = player.total.to_string();
            writer.write_record([record.match_id.as_str(), player.name.as_str(), total.as_str()])?;
        }
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| err.into_error())
        .context("flush csv")?;
    String::from_utf8(bytes).context("csv output is not utf-8")
}
