use crate::error::{ProcessingError, Result};

/// Convert a `D:M:S` string to decimal degrees
///
/// # Examples
/// ```
/// use ghcnd_explorer::utils::dms_to_decimal;
///
/// let decimal = dms_to_decimal("52:31:12").unwrap();
/// assert!((decimal - 52.52).abs() < 0.000001);
/// ```
pub fn dms_to_decimal(dms: &str) -> Result<f64> {
    let parts: Vec<&str> = dms.split(':').map(str::trim).collect();

    let [degrees, minutes, seconds] = parts.as_slice() else {
        return Err(ProcessingError::InvalidCoordinate(format!(
            "Invalid DMS format: '{}'. Expected format: 'DD:MM:SS'",
            dms
        )));
    };

    let parse = |label: &str, value: &str| {
        value.parse::<f64>().map_err(|_| {
            ProcessingError::InvalidCoordinate(format!("Invalid {} value: '{}'", label, value))
        })
    };

    let degrees_value = parse("degrees", degrees)?;
    let minutes_value = parse("minutes", minutes)?;
    let seconds_value = parse("seconds", seconds)?;

    if !(0.0..60.0).contains(&minutes_value) || !(0.0..60.0).contains(&seconds_value) {
        return Err(ProcessingError::InvalidCoordinate(format!(
            "Minutes and seconds must be in [0, 60): '{}'",
            dms
        )));
    }

    // "-0:30:00" carries its sign on a zero degree field
    let magnitude = degrees_value.abs() + minutes_value / 60.0 + seconds_value / 3600.0;
    if degrees.starts_with('-') {
        Ok(-magnitude)
    } else {
        Ok(magnitude)
    }
}

/// Parse a coordinate given as decimal degrees or `D:M:S`, with an optional
/// trailing hemisphere letter (`N`, `S`, `E`, `W`)
pub fn parse_coordinate(coord_str: &str) -> Result<f64> {
    let trimmed = coord_str.trim();

    let (body, negate) = match trimmed.chars().last().map(|c| c.to_ascii_uppercase()) {
        Some('S') | Some('W') => (&trimmed[..trimmed.len() - 1], true),
        Some('N') | Some('E') => (&trimmed[..trimmed.len() - 1], false),
        _ => (trimmed, false),
    };
    let body = body.trim();

    let value = if body.contains(':') {
        dms_to_decimal(body)?
    } else {
        body.parse::<f64>().map_err(|_| {
            ProcessingError::InvalidCoordinate(format!("Invalid coordinate value: '{}'", coord_str))
        })?
    };

    if !value.is_finite() {
        return Err(ProcessingError::InvalidCoordinate(format!(
            "Coordinate is not finite: '{}'",
            coord_str
        )));
    }

    Ok(if negate { -value.abs() } else { value })
}
