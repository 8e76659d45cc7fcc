use std::io::Write;

use chrono::{DateTime, SecondsFormat, Utc};
use env_logger::Env;
use log::Record;
use serde_json::{json, Value};

use crate::config::ShopieaArgs;

/// Installs the global logger. Production deployments get one JSON object per
/// line; everything else keeps env_logger's plain format.
pub fn init(args: &ShopieaArgs) {
    let default_level = if args.is_release() { "info" } else { "debug" };
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or(default_level));
    if args.is_production() {
        builder.format(|buf, record| writeln!(buf, "{}", json_line(record, Utc::now())));
    }
    builder.init();
}

fn json_line(record: &Record, at: DateTime<Utc>) -> Value {
    json!({
        "level": record.level().as_str().to_ascii_lowercase(),
        "ts": at.to_rfc3339_opts(SecondsFormat::Millis, true),
        "target": record.target(),
        "msg": record.args().to_string(),
    })
}
