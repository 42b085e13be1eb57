/* Preprocessing pass: one forward scan over the instruction stream that
   collects jump labels, try/catch intervals and packed-switch tables, so the
   execution loop can resolve every control transfer with a table lookup. */

use log::{debug, warn};
use nom::bytes::complete::{tag, take_while1};
use nom::character::complete::{char, space0, space1};
use nom::sequence::delimited;
use nom::IResult;
use num_bigint::BigInt;
use std::collections::HashMap;

use crate::instructions::{parse_label, parse_literal_int, Label};
use crate::source::Source;
use crate::types::EmuError;

/// One recorded try/catch region: the interval is in instruction indices,
/// from the `:try_start_<id>` line to the `.catch` directive itself.
#[derive(Debug, Clone, PartialEq)]
pub struct CatchBlock {
    pub start: usize,
    pub end: usize,
    pub handler: Label,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PackedSwitch {
    pub first_value: BigInt,
    pub cases: Vec<Label>,
}

/// Lookup tables built by [`preprocess`]; read-only once execution starts.
#[derive(Debug, Default)]
pub struct ControlTables {
    pub labels: HashMap<Label, usize>,
    pub catch_blocks: Vec<CatchBlock>,
    pub packed_switches: HashMap<Label, PackedSwitch>,
}

/// Scans the stream once before execution. Trades one linear pass for O(1)
/// label, catch and switch lookups in the hot loop.
pub fn preprocess(source: &Source) -> Result<ControlTables, EmuError> {
    let mut tables = ControlTables::default();
    let mut index = 0;
    while index < source.len() {
        let line = source.line(index).unwrap_or("");
        if line.starts_with(':') {
            if let Some(id) = line.strip_prefix(":try_start_") {
                match find_catch_directive(source, index, id) {
                    Some(block) => tables.catch_blocks.push(block),
                    None => warn!("no .catch directive found for :try_start_{}", id),
                }
            } else if line.starts_with(":try_end_") {
                // the interval was recorded when the matching :try_start_ was seen
            } else if line.starts_with(":pswitch_data") {
                index = collect_packed_switch(source, index, &mut tables)?;
            } else {
                tables.labels.insert(Label(line[1..].to_string()), index);
            }
        }
        index += 1;
    }
    debug!(
        "preprocessed {} labels, {} catch blocks, {} switch tables",
        tables.labels.len(),
        tables.catch_blocks.len(),
        tables.packed_switches.len()
    );
    Ok(tables)
}

/// Scans forward from a `:try_start_<id>` line for the matching directive:
///
///   .catch Ljava/lang/Exception; {:try_start_<id> .. :try_end_<id>} :handler
///
/// Only the first match counts.
fn find_catch_directive(source: &Source, start: usize, id: &str) -> Option<CatchBlock> {
    for index in start + 1..source.len() {
        let line = source.line(index)?;
        if let Ok((_, handler)) = catch_directive(line, id) {
            return Some(CatchBlock { start, end: index, handler });
        }
    }
    None
}

fn catch_directive<'a>(input: &'a str, id: &str) -> IResult<&'a str, Label> {
    let (input, _) = tag(".catch")(input)?;
    let (input, _) = space1(input)?;
    let (input, _exception_type) = take_while1(|c: char| !c.is_whitespace())(input)?;
    let (input, _) = space1(input)?;
    let (input, _) = char('{')(input)?;
    let (input, _) = tag(":try_start_")(input)?;
    let (input, _) = tag(id)(input)?;
    let (input, _) = delimited(space0, tag(".."), space0)(input)?;
    let (input, _) = tag(":try_end_")(input)?;
    let (input, _) = tag(id)(input)?;
    let (input, _) = char('}')(input)?;
    let (input, _) = space0(input)?;
    parse_label(input)
}

/// Consumes a `:pswitch_data_<id>` region:
///
///   .packed-switch <base-value>
///   :pswitch_<n> ...
///   .end packed-switch
///
/// Returns the index of the closing directive so the caller resumes after
/// the region; the case labels inside it are switch cases, not jump targets.
fn collect_packed_switch(
    source: &Source,
    start: usize,
    tables: &mut ControlTables,
) -> Result<usize, EmuError> {
    let name = Label(source.line(start).unwrap_or("")[1..].to_string());
    let mut switch = PackedSwitch::default();

    for index in start + 1..source.len() {
        let line = source.line(index).unwrap_or("");
        if let Some(base) = line.strip_prefix(".packed-switch ") {
            match parse_literal_int(base.trim_start()) {
                Ok((_, value)) => switch.first_value = value,
                Err(_) => {
                    return Err(EmuError::bad_switch_table(
                        index,
                        line,
                        format!("bad base value in '{}'", line),
                    ))
                }
            }
        } else if line.starts_with(":pswitch_") {
            switch.cases.push(Label(line[1..].to_string()));
        } else if line == ".end packed-switch" {
            tables.packed_switches.insert(name, switch);
            return Ok(index);
        } else {
            return Err(EmuError::bad_switch_table(
                index,
                line,
                format!("unexpected line '{}' while preprocessing packed-switch", line),
            ));
        }
    }

    Err(EmuError::bad_switch_table(
        start,
        source.line(start).unwrap_or(""),
        format!("packed-switch region {} is never closed", name),
    ))
}
