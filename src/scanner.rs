//! Reader for variable-length characteristic tables.
//!
//! Traction and braking sheets lay curves out as named blocks: a name in
//! column A followed by a fixed window of [`BLOCK_WINDOW`] rows holding
//! samples in columns B onward. The next block name sits right after the
//! window, whatever number of rows inside it were filled. An empty name
//! cell ends the table.

use serde::Serialize;

use crate::error::Result;
use crate::excel::Sheet;
use crate::types::{AcCharacteristic, CurrentKind, DcCharacteristic, ElectricalCharacteristic};

/// Rows reserved for each block after its name row.
pub const BLOCK_WINDOW: u32 = 30;

const FIRST_NAME_ROW: u32 = 2;
const NAME_COLUMN: u32 = 1;
const SPEED_COLUMN: u32 = 2;

/// A named group of curve samples (a traction position or braking stage).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElectricalPosition {
    pub name: String,
    pub characteristics: Vec<ElectricalCharacteristic>,
}

enum ScanState {
    AwaitingBlockName {
        row: u32,
    },
    ScanningRows {
        block: ElectricalPosition,
        row: u32,
        scanned: u32,
    },
    BlockComplete {
        block: ElectricalPosition,
        next_row: u32,
    },
}

/// Scans all blocks of a characteristic sheet.
///
/// Rows whose speed cell is empty are skipped; a speed cell holding text
/// that is not a number fails the scan. `current` selects the AC or DC
/// sample layout.
pub fn scan_blocks(sheet: &Sheet, current: CurrentKind) -> Result<Vec<ElectricalPosition>> {
    let mut blocks = Vec::new();
    let mut state = ScanState::AwaitingBlockName {
        row: FIRST_NAME_ROW,
    };

    loop {
        state = match state {
            ScanState::AwaitingBlockName { row } => match sheet.opt_string(row, NAME_COLUMN) {
                None => break,
                Some(name) => ScanState::ScanningRows {
                    block: ElectricalPosition {
                        name,
                        characteristics: Vec::new(),
                    },
                    row: row + 1,
                    scanned: 0,
                },
            },
            ScanState::ScanningRows {
                mut block,
                row,
                scanned,
            } if scanned < BLOCK_WINDOW => {
                if sheet.opt_float(row, SPEED_COLUMN)?.is_some() {
                    block
                        .characteristics
                        .push(read_characteristic(sheet, row, current)?);
                }
                ScanState::ScanningRows {
                    block,
                    row: row + 1,
                    scanned: scanned + 1,
                }
            }
            ScanState::ScanningRows { block, row, .. } => ScanState::BlockComplete {
                block,
                next_row: row,
            },
            ScanState::BlockComplete { block, next_row } => {
                tracing::debug!(
                    sheet = sheet.name(),
                    block = %block.name,
                    samples = block.characteristics.len(),
                    "characteristic block scanned"
                );
                blocks.push(block);
                ScanState::AwaitingBlockName { row: next_row }
            }
        };
    }

    Ok(blocks)
}

fn read_characteristic(
    sheet: &Sheet,
    row: u32,
    current: CurrentKind,
) -> Result<ElectricalCharacteristic> {
    let value = |offset: u32| sheet.float(row, SPEED_COLUMN + offset);

    Ok(match current {
        CurrentKind::Alternating => ElectricalCharacteristic::Alternating(AcCharacteristic::new(
            value(0)?,
            value(1)?,
            value(2)?,
            value(3)?,
            value(4)?,
        )),
        CurrentKind::Direct => ElectricalCharacteristic::Direct(DcCharacteristic::new(
            value(0)?,
            value(1)?,
            value(2)?,
            value(3)?,
        )),
    })
}
