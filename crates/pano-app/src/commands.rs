//! Line-based command language read from stdin

use anyhow::{anyhow, bail, Context, Result};
use pano_core::{EdgeDirection, RawInput};

/// One parsed command line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Raw input routed through the normalizer / gesture tracker
    Input(RawInput),
    /// Programmatic navigation to an absolute index
    Goto(i64),
    /// Toggle expansion; `None` means the current section
    Expand(Option<usize>),
    /// One-time audio decision
    Consent(bool),
    /// The external scene finished loading
    AttachScene,
    /// Overflow measurements as `index=bool` pairs
    Overflow(Vec<(usize, bool)>),
    Resize(f32),
    /// Stop reading input for a while; frames keep ticking
    Wait(u64),
    Status,
    Quit,
}

fn parse_bool(word: &str) -> Result<bool> {
    match word {
        "yes" | "y" | "true" | "on" | "1" => Ok(true),
        "no" | "n" | "false" | "off" | "0" => Ok(false),
        other => bail!("expected yes/no, got '{}'", other),
    }
}

fn arg<'a>(words: &[&'a str], idx: usize, what: &str) -> Result<&'a str> {
    words.get(idx).copied().ok_or_else(|| anyhow!("missing {}", what))
}

/// Parse one line. Blank lines and `#` comments yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let words: Vec<&str> = line.split_whitespace().collect();

    let command = match words[0] {
        "wheel" => {
            let delta_y: f32 = arg(&words, 1, "wheel delta")?.parse().context("wheel delta")?;
            Command::Input(RawInput::Wheel { delta_y })
        }
        "key" => {
            let key = arg(&words, 1, "key")?;
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Command::Input(RawInput::Key(c)),
                _ => bail!("key must be a single character, got '{}'", key),
            }
        }
        "click" => {
            let index: usize = arg(&words, 1, "indicator index")?
                .parse()
                .context("indicator index")?;
            Command::Input(RawInput::IndicatorClick(index))
        }
        "scene" => {
            let target_name = arg(&words, 1, "scene target name")?.to_string();
            Command::Input(RawInput::SceneEvent { target_name })
        }
        "edge" => {
            let section: usize = arg(&words, 1, "section")?.parse().context("section")?;
            let direction = match arg(&words, 2, "direction")? {
                "left" => EdgeDirection::Left,
                "right" => EdgeDirection::Right,
                other => bail!("direction must be left or right, got '{}'", other),
            };
            Command::Input(RawInput::EdgeArrow { section, direction })
        }
        "drag" => match arg(&words, 1, "drag phase")? {
            "start" => {
                let x: f32 = arg(&words, 2, "x")?.parse().context("x")?;
                Command::Input(RawInput::DragStart { x })
            }
            "move" => {
                let x: f32 = arg(&words, 2, "x")?.parse().context("x")?;
                Command::Input(RawInput::DragMove { x })
            }
            "end" => Command::Input(RawInput::DragEnd),
            other => bail!("unknown drag phase '{}'", other),
        },
        "goto" => Command::Goto(arg(&words, 1, "index")?.parse().context("index")?),
        "expand" => match words.get(1) {
            Some(index) => Command::Expand(Some(index.parse().context("index")?)),
            None => Command::Expand(None),
        },
        "consent" => Command::Consent(parse_bool(arg(&words, 1, "yes/no")?)?),
        "load-scene" => Command::AttachScene,
        "overflow" => {
            let mut pairs = Vec::new();
            for pair in &words[1..] {
                let (index, flag) = pair
                    .split_once('=')
                    .ok_or_else(|| anyhow!("overflow entries look like 2=yes, got '{}'", pair))?;
                pairs.push((index.parse().context("overflow index")?, parse_bool(flag)?));
            }
            Command::Overflow(pairs)
        }
        "resize" => Command::Resize(arg(&words, 1, "width")?.parse().context("width")?),
        "wait" => Command::Wait(arg(&words, 1, "milliseconds")?.parse().context("milliseconds")?),
        "status" => Command::Status,
        "quit" | "exit" => Command::Quit,
        other => bail!("unknown command '{}'", other),
    };
    Ok(Some(command))
}
