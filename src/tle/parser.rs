//! TLE parsing utilities

use chrono::{DateTime, Utc};

use crate::tle::types::TleSet;

/// Parse TLE epoch from line 1 to UTC DateTime
pub fn parse_tle_epoch_to_utc(line1: &str) -> Option<DateTime<Utc>> {
    // TLE line1 epoch fields (columns 19–32, 1-based; 18..32 0-based)
    let s = line1.get(18..32)?;
    let mut parts = s.trim().split('.');
    let yyddd = parts.next()?;
    let frac = parts.next().unwrap_or("0");
    if yyddd.len() < 3 {
        return None;
    }
    let (yy_str, ddd_str) = yyddd.split_at(2);
    let yy: i32 = yy_str.parse().ok()?;
    let ddd: i32 = ddd_str.parse().ok()?;
    let year = if yy >= 57 { 1900 + yy } else { 2000 + yy };
    let jan1 = chrono::NaiveDate::from_ymd_opt(year, 1, 1)?;
    let date = jan1.checked_add_signed(chrono::Duration::days((ddd - 1) as i64))?;
    let frac_sec: f64 = format!("0.{}", frac).parse::<f64>().ok()? * 86400.0;
    let secs = frac_sec.trunc() as i64;
    let nanos = ((frac_sec - (secs as f64)) * 1e9).round() as i64;
    let ndt = date.and_hms_opt(0, 0, 0)?
        + chrono::Duration::seconds(secs)
        + chrono::Duration::nanoseconds(nanos);
    Some(DateTime::<Utc>::from_naive_utc_and_offset(ndt, Utc))
}

/// Scan an arbitrary text body (one TLE or a whole Celestrak group file) for
/// the line-1/line-2 pair of `norad_id`, with an optional name line before it.
pub fn extract_tle_block(body: &str, norad_id: u32) -> anyhow::Result<TleSet> {
    let lines: Vec<&str> = body
        .lines()
        .map(|raw| raw.trim_matches(|c| c == '\u{feff}' || c == '\r' || c == '\n' || c == ' '))
        .filter(|line| !line.is_empty())
        .collect();

    let sat_fmt = format!("{:05}", norad_id);
    for i in 0..lines.len().saturating_sub(1) {
        let l1 = lines[i];
        let l2 = lines[i + 1];
        if !l1.starts_with('1') || !l2.starts_with('2') {
            continue;
        }
        let sat_ok = l1.get(2..7) == Some(sat_fmt.as_str()) && l2.get(2..7) == Some(sat_fmt.as_str());
        if !sat_ok {
            continue;
        }
        // Prefer a text name line immediately before l1 if it is not a TLE line
        let name = i
            .checked_sub(1)
            .map(|p| lines[p])
            .filter(|p| !p.starts_with('1') && !p.starts_with('2'))
            .map(str::to_string);
        let epoch_utc = parse_tle_epoch_to_utc(l1)
            .ok_or_else(|| anyhow::anyhow!("Unreadable epoch in line 1 for {}", norad_id))?;
        return Ok(TleSet {
            name,
            line1: l1.to_string(),
            line2: l2.to_string(),
            epoch_utc,
        });
    }

    let sample: String = body.lines().take(6).collect::<Vec<_>>().join("\\n");
    anyhow::bail!("No valid TLE pair found for {}. Sample: {}", norad_id, sample);
}
