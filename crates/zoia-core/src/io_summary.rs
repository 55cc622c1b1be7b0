//! Audio/MIDI interface quick-view.
//!
//! Modules are classified by their type name. Audio inputs and outputs report
//! their channel layout, MIDI modules their channel, stompswitches which
//! footswitch they listen to. A category with no module is `None`.

use std::cmp::Ordering;

use serde_json::Value;

use crate::patch::error::PatchError;
use crate::{IoSummary, IoValue, Module};

const AUDIO_INPUT: &str = "Audio Input";
const AUDIO_OUTPUT: &str = "Audio Output";
const STOMPSWITCH: &str = "Stompswitch";
const MIDI_MARKER: &str = "midi";

const CHANNELS_OPTION: &str = "channels";
const MIDI_CHANNEL_OPTION: &str = "midi_channel";
const STOMPSWITCH_OPTION: &str = "stompswitch";

/// Derive the I/O summary of a decoded module list.
///
/// # Errors
/// Returns `PatchError::MissingIoOption` when an audio or stompswitch module
/// lacks the option its category reports. MIDI modules without a channel
/// option are skipped instead.
pub fn summarize_io(modules: &[Module]) -> Result<IoSummary, PatchError> {
    Ok(IoSummary {
        inputs: channel_layouts(modules, AUDIO_INPUT)?,
        outputs: channel_layouts(modules, AUDIO_OUTPUT)?,
        midi_channel: midi_channels(modules),
        stompswitches: stompswitches(modules)?,
    })
}

fn channel_layouts(modules: &[Module], module_type: &str) -> Result<Option<IoValue>, PatchError> {
    let mut layouts = modules
        .iter()
        .filter(|module| module.module_type == module_type)
        .map(|module| {
            required_option(module, CHANNELS_OPTION).map(|value| Value::String(title_value(value)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(match layouts.len() {
        0 => None,
        1 => layouts.pop().map(IoValue::One),
        _ => Some(IoValue::Many(layouts)),
    })
}

fn midi_channels(modules: &[Module]) -> Option<IoValue> {
    let channels: Vec<Value> = modules
        .iter()
        .filter(|module| module.module_type.to_lowercase().contains(MIDI_MARKER))
        .filter_map(|module| module.options.get(MIDI_CHANNEL_OPTION).cloned())
        .collect();

    let mut distinct = dedupe(channels);
    distinct.sort_by(compare_values);
    match distinct.len() {
        0 => None,
        1 => distinct.pop().map(IoValue::One),
        _ => Some(IoValue::Many(distinct)),
    }
}

fn stompswitches(modules: &[Module]) -> Result<Option<IoValue>, PatchError> {
    let switches = modules
        .iter()
        .filter(|module| module.module_type == STOMPSWITCH)
        .map(|module| required_option(module, STOMPSWITCH_OPTION).map(title_value))
        .collect::<Result<Vec<_>, _>>()?;

    let mut distinct: Vec<String> = Vec::new();
    for switch in switches {
        if !distinct.contains(&switch) {
            distinct.push(switch);
        }
    }
    distinct.sort();

    Ok(match distinct.len() {
        0 => None,
        1 => distinct.pop().map(IoValue::from),
        _ => Some(IoValue::from(format!("[{}]", distinct.join(", ")))),
    })
}

fn required_option<'m>(module: &'m Module, option: &'static str) -> Result<&'m Value, PatchError> {
    module
        .options
        .get(option)
        .ok_or_else(|| PatchError::MissingIoOption {
            module: module.number,
            module_type: module.module_type.clone(),
            option,
        })
}

fn dedupe(values: Vec<Value>) -> Vec<Value> {
    let mut distinct = Vec::with_capacity(values.len());
    for value in values {
        if !distinct.contains(&value) {
            distinct.push(value);
        }
    }
    distinct
}

/// Numbers sort numerically, everything else by its JSON text.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

fn title_value(value: &Value) -> String {
    match value {
        Value::String(text) => title_case(text),
        other => title_case(&other.to_string()),
    }
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest.
fn title_case(text: &str) -> String {
    let mut titled = String::with_capacity(text.len());
    let mut in_word = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if in_word {
                titled.extend(ch.to_lowercase());
            } else {
                titled.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            titled.push(ch);
            in_word = false;
        }
    }
    titled
}
