/// Rig preset parser for the line-oriented `key value` text format
use nom::{
    bytes::complete::take_while1, character::complete::multispace1, number::complete::float,
    sequence::preceded, IResult,
};
use thiserror::Error;

use crate::rig::{RigConfig, RigError};

/// A malformed or invalid preset file.
#[derive(Debug, Error, PartialEq)]
pub enum PresetError {
    #[error("line {line}: expected `key value`")]
    Syntax { line: usize },
    #[error("line {line}: unknown key `{key}`")]
    UnknownKey { line: usize, key: String },
    #[error("line {line}: `{key}` must be a non-negative whole number")]
    Count { line: usize, key: String },
    #[error("line {line}: unknown rig `{name}`")]
    UnknownRig { line: usize, name: String },
    #[error(transparent)]
    Rig(#[from] RigError),
}

/// Parse a rig preset.
///
/// The format is one `key value` pair per line. Blank lines and `#` comments
/// are ignored, and a comment may follow a value on the same line. Parsing
/// starts from [`RigConfig::default`]; a `rig <name>` line swaps in a builtin
/// preset, and later lines override individual fields:
///
/// ```text
/// # taller boom, slower cable
/// rig high-mast
/// boom_size 30
/// hook_step 2.5
/// ```
///
/// The resulting configuration is validated before being returned.
pub fn parse_preset(input: &str) -> Result<RigConfig, PresetError> {
    let mut rig = RigConfig::default();

    for (idx, raw) in input.lines().enumerate() {
        let line = idx + 1;
        let text = raw.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        let (rest, key) = identifier(text).map_err(|_| PresetError::Syntax { line })?;
        match key {
            "rig" => {
                let name = parse_word(rest, line)?;
                rig = RigConfig::builtin(name).ok_or_else(|| PresetError::UnknownRig {
                    line,
                    name: name.to_string(),
                })?;
            }
            "name" => {
                rig.name = parse_word(rest, line)?.to_string();
            }
            _ => {
                let value = parse_number(rest, line)?;
                apply_key(&mut rig, key, value, line)?;
            }
        }
    }

    rig.validate()?;
    Ok(rig)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-')(input)
}

fn parse_word(input: &str, line: usize) -> Result<&str, PresetError> {
    let (rest, value) =
        preceded(multispace1, identifier)(input).map_err(|_| PresetError::Syntax { line })?;
    expect_line_end(rest, line)?;
    Ok(value)
}

fn parse_number(input: &str, line: usize) -> Result<f32, PresetError> {
    let (rest, value) =
        preceded(multispace1, float::<_, nom::error::Error<&str>>)(input)
            .map_err(|_| PresetError::Syntax { line })?;
    expect_line_end(rest, line)?;
    Ok(value)
}

fn expect_line_end(input: &str, line: usize) -> Result<(), PresetError> {
    // A trailing comment after the value is fine.
    let rest = input.trim_start();
    if rest.is_empty() || rest.starts_with('#') {
        Ok(())
    } else {
        Err(PresetError::Syntax { line })
    }
}

fn apply_key(rig: &mut RigConfig, key: &str, value: f32, line: usize) -> Result<(), PresetError> {
    match key {
        "ground_length" => rig.ground_length = value,
        "base_side" => rig.base_side = value,
        "base_count" => rig.base_count = parse_count(key, value, line)?,
        "lift_side" => rig.lift_side = value,
        "lift_count" => rig.lift_count = parse_count(key, value, line)?,
        "boom_size" => rig.boom_size = parse_count(key, value, line)?,
        "hook_step" => rig.hook_step = value,
        "slew_step" => rig.slew_step = value,
        "trolley_step" => rig.trolley_step = value,
        "trolley_min" => rig.trolley_min = value,
        "hook_init" => rig.hook_init = value,
        "hook_reach" => rig.hook_reach = value,
        "block_descent_rate" => rig.block_descent_rate = value,
        "block_rest_height" => rig.block_rest_height = value,
        "reattach_tolerance_deg" => rig.reattach_tolerance_deg = value,
        "zoom" => rig.zoom = value,
        _ => {
            return Err(PresetError::UnknownKey {
                line,
                key: key.to_string(),
            })
        }
    }
    Ok(())
}

fn parse_count(key: &str, value: f32, line: usize) -> Result<usize, PresetError> {
    if value >= 0.0 && value.fract() == 0.0 {
        Ok(value as usize)
    } else {
        Err(PresetError::Count {
            line,
            key: key.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_preset_is_default() {
        let rig = parse_preset("").unwrap();
        assert_eq!(rig, RigConfig::default());
    }

    #[test]
    fn test_comments_and_blanks_ignored() {
        let rig = parse_preset("# a crane\n\n  # indented comment\nboom_size 24\n").unwrap();
        assert_eq!(rig.boom_size, 24);
    }

    #[test]
    fn test_rig_line_selects_builtin() {
        let rig = parse_preset("rig high-mast\n").unwrap();
        assert_eq!(rig, RigConfig::high_mast());
    }

    #[test]
    fn test_overrides_apply_after_rig_line() {
        let rig = parse_preset("rig high-mast\nboom_size 30\nname skyline\n").unwrap();
        assert_eq!(rig.boom_size, 30);
        assert_eq!(rig.name, "skyline");
        assert_eq!(rig.base_count, 14);
    }

    #[test]
    fn test_trailing_comment_after_value() {
        let rig = parse_preset("zoom 45 # wider view\n").unwrap();
        assert_eq!(rig.zoom, 45.0);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = parse_preset("boom_size 20\njib_length 5\n").unwrap_err();
        assert_eq!(
            err,
            PresetError::UnknownKey {
                line: 2,
                key: "jib_length".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_rig_rejected() {
        let err = parse_preset("rig skyline\n").unwrap_err();
        assert_eq!(
            err,
            PresetError::UnknownRig {
                line: 1,
                name: "skyline".to_string()
            }
        );
    }

    #[test]
    fn test_fractional_count_rejected() {
        let err = parse_preset("base_count 2.5\n").unwrap_err();
        assert_eq!(
            err,
            PresetError::Count {
                line: 1,
                key: "base_count".to_string()
            }
        );
    }

    #[test]
    fn test_negative_count_rejected() {
        assert!(parse_preset("lift_count -3\n").is_err());
    }

    #[test]
    fn test_missing_value_is_syntax_error() {
        let err = parse_preset("boom_size\n").unwrap_err();
        assert_eq!(err, PresetError::Syntax { line: 1 });
    }

    #[test]
    fn test_invalid_rig_rejected_after_parse() {
        let err = parse_preset("boom_size 9\n").unwrap_err();
        assert!(matches!(err, PresetError::Rig(_)));
    }
}
