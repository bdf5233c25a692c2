//! Parsing of single coordinates given as decimal degrees or degrees/minutes/seconds.
//!
//! Accepted forms include `53.3478`, `-6.2597`, `53°20'52.1"N`, `6 15 35 W`, `53:20:52` and
//! `N 53°20.868'`. A hemisphere letter (N/E positive, S/W negative) may lead or trail.

use anyhow::{Result, bail, ensure};
use regex::Regex;
use std::sync::LazyLock;

static RE_PARTS: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^([+-]?\d+(?:\.\d+)?)(?:\s+(\d+(?:\.\d+)?))?(?:\s+(\d+(?:\.\d+)?))?$").unwrap()
});

/// Parses one coordinate into signed decimal degrees.
pub fn parse_coordinate(input: &str) -> Result<f64> {
	let mut text = input.trim().to_uppercase();
	ensure!(!text.is_empty(), "empty coordinate");

	let hemisphere = if text.ends_with(['N', 'S', 'E', 'W']) {
		text.pop()
	} else if text.starts_with(['N', 'S', 'E', 'W']) {
		Some(text.remove(0))
	} else {
		None
	};

	let text = text
		.replace(['°', '\'', '"', '′', '″', ':'], " ")
		.split_whitespace()
		.collect::<Vec<_>>()
		.join(" ");

	let Some(caps) = RE_PARTS.captures(&text) else {
		bail!("cannot parse coordinate {input:?}");
	};

	let degrees: f64 = caps[1].parse()?;
	let minutes: f64 = caps.get(2).map_or(Ok(0.0), |m| m.as_str().parse())?;
	let seconds: f64 = caps.get(3).map_or(Ok(0.0), |m| m.as_str().parse())?;
	ensure!(minutes < 60.0, "minutes ({minutes}) must be < 60 in {input:?}");
	ensure!(seconds < 60.0, "seconds ({seconds}) must be < 60 in {input:?}");
	if hemisphere.is_some() && degrees.is_sign_negative() {
		bail!("coordinate {input:?} has both a minus sign and a hemisphere");
	}

	let value = degrees.abs() + minutes / 60.0 + seconds / 3600.0;
	let negative = degrees.is_sign_negative() || matches!(hemisphere, Some('S' | 'W'));
	Ok(if negative { -value } else { value })
}
