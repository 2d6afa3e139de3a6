use tickboot_serde::BitReader;

use super::{
    error::FormatError,
    huffman::HuffmanTable,
    state::{InflateState, OutputBuffer, OutputWindow},
    tables::{
        CODE_LENGTH_ORDER, DISTANCE_BASE, DISTANCE_EXTRA, DISTANCE_SYMBOLS, END_OF_BLOCK,
        FIRST_LENGTH_SYMBOL, FIXED_DISTANCE_TABLE, FIXED_LITERAL_TABLE, LAST_LENGTH_SYMBOL,
        LENGTH_BASE, LENGTH_EXTRA, MAX_DISTANCE_CODES, MAX_LITERAL_CODES,
    },
};

/// Decompresses a raw DEFLATE stream.
///
/// Without a `state` the whole stream must be present: running out of input
/// before the final block is a [`FormatError::UnexpectedEof`], and the full
/// output is returned, trimmed to its exact length.
///
/// With a `state` the call may be repeated as input arrives. Each call must
/// pass the complete input seen so far; decoding picks up at the start of
/// the first block not yet finished, and the bytes produced by this call are
/// returned. `output` only applies to a state that has not been used yet.
/// Once the state is final, further calls return an empty buffer.
///
/// A preset `dictionary` supplies the bytes that back-references may reach
/// before the start of the output.
pub fn inflate(
    input: &[u8],
    state: Option<&mut InflateState>,
    output: OutputBuffer,
    dictionary: Option<&[u8]>,
) -> Result<Vec<u8>, FormatError> {
    let dictionary = dictionary.unwrap_or(&[]);

    match state {
        None => {
            let mut state = InflateState {
                window: OutputWindow::new(output),
                started: true,
                ..InflateState::default()
            };
            run_blocks(input, &mut state, dictionary, false)?;
            Ok(state.window.into_bytes())
        }
        Some(state) => {
            if state.final_block {
                return Ok(Vec::new());
            }
            if !state.started {
                state.window = OutputWindow::new(output);
                state.started = true;
            }
            let produced_before = state.window.len();
            run_blocks(input, state, dictionary, true)?;
            Ok(state.window.bytes()[produced_before..].to_vec())
        }
    }
}

fn run_blocks(
    input: &[u8],
    state: &mut InflateState,
    dictionary: &[u8],
    resumable: bool,
) -> Result<(), FormatError> {
    let mut reader = BitReader::new(input);
    reader.set_bit_position(state.bit_position);

    while !state.final_block {
        let block_start_bits = reader.bit_position();
        let block_start_len = state.window.len();

        match decode_block(&mut reader, &mut state.window, dictionary) {
            Ok(is_final) => {
                state.final_block = is_final;
                state.bit_position = reader.bit_position();
            }
            Err(FormatError::UnexpectedEof) if resumable => {
                // replay this block from its header once more input arrives
                state.window.truncate(block_start_len);
                state.bit_position = block_start_bits;
                return Ok(());
            }
            Err(err) => return Err(err),
        }
    }

    Ok(())
}

fn decode_block(
    reader: &mut BitReader,
    window: &mut OutputWindow,
    dictionary: &[u8],
) -> Result<bool, FormatError> {
    let is_final = reader.read_bit()?;
    let block_type = reader.read_bits(2)? as u8;

    match block_type {
        0 => copy_stored_block(reader, window)?,
        1 => decode_symbols(
            reader,
            window,
            &FIXED_LITERAL_TABLE,
            &FIXED_DISTANCE_TABLE,
            dictionary,
        )?,
        2 => {
            let (literal_table, distance_table) = read_dynamic_tables(reader)?;
            decode_symbols(reader, window, &literal_table, &distance_table, dictionary)?;
        }
        _ => return Err(FormatError::InvalidBlockType { block_type }),
    }

    Ok(is_final)
}

fn copy_stored_block(reader: &mut BitReader, window: &mut OutputWindow) -> Result<(), FormatError> {
    reader.align_to_byte();
    let length = reader.read_u16_le()?;
    let complement = reader.read_u16_le()?;
    if length != !complement {
        return Err(FormatError::StoredLengthMismatch { length, complement });
    }
    let bytes = reader.read_aligned_bytes(usize::from(length))?;
    window.extend(bytes)
}

/// Decodes one symbol, telling a truncated stream apart from a bad code.
fn read_symbol(
    reader: &mut BitReader,
    table: &HuffmanTable,
    invalid: fn(usize) -> FormatError,
) -> Result<u16, FormatError> {
    let entry = table.lookup(reader);
    if entry.length == 0 {
        if reader.remaining_bits() < usize::from(table.max_bits()) {
            return Err(FormatError::UnexpectedEof);
        }
        return Err(invalid(reader.bit_position()));
    }
    reader.consume(entry.length)?;
    Ok(entry.symbol)
}

fn invalid_literal(bit_position: usize) -> FormatError {
    FormatError::InvalidLiteralLength { bit_position }
}

fn invalid_distance(bit_position: usize) -> FormatError {
    FormatError::InvalidDistanceCode { bit_position }
}

fn invalid_code_length(bit_position: usize) -> FormatError {
    FormatError::InvalidCodeLengthSymbol { bit_position }
}

fn decode_symbols(
    reader: &mut BitReader,
    window: &mut OutputWindow,
    literal_table: &HuffmanTable,
    distance_table: &HuffmanTable,
    dictionary: &[u8],
) -> Result<(), FormatError> {
    loop {
        let symbol_position = reader.bit_position();
        let symbol = read_symbol(reader, literal_table, invalid_literal)?;

        if symbol < END_OF_BLOCK {
            window.push(symbol as u8)?;
            continue;
        }
        if symbol == END_OF_BLOCK {
            return Ok(());
        }
        if !(FIRST_LENGTH_SYMBOL..=LAST_LENGTH_SYMBOL).contains(&symbol) {
            return Err(invalid_literal(symbol_position));
        }

        let length_index = usize::from(symbol - FIRST_LENGTH_SYMBOL);
        let length = usize::from(LENGTH_BASE[length_index])
            + reader.read_bits(LENGTH_EXTRA[length_index])? as usize;

        let distance_position = reader.bit_position();
        let distance_symbol = read_symbol(reader, distance_table, invalid_distance)?;
        if distance_symbol >= DISTANCE_SYMBOLS {
            return Err(invalid_distance(distance_position));
        }
        let distance_index = usize::from(distance_symbol);
        let distance = usize::from(DISTANCE_BASE[distance_index])
            + reader.read_bits(DISTANCE_EXTRA[distance_index])? as usize;

        window.copy_match(length, distance, dictionary)?;
    }
}

fn read_dynamic_tables(reader: &mut BitReader) -> Result<(HuffmanTable, HuffmanTable), FormatError> {
    let literal_codes = reader.read_bits(5)? as usize + 257;
    let distance_codes = reader.read_bits(5)? as usize + 1;
    let code_length_codes = reader.read_bits(4)? as usize + 4;

    if literal_codes > MAX_LITERAL_CODES || distance_codes > MAX_DISTANCE_CODES {
        return Err(FormatError::InvalidHeader {
            literal_codes,
            distance_codes,
        });
    }

    let mut code_length_lengths = [0u8; 19];
    for &symbol in CODE_LENGTH_ORDER.iter().take(code_length_codes) {
        code_length_lengths[symbol] = reader.read_bits(3)? as u8;
    }
    let code_length_table = HuffmanTable::from_lengths(&code_length_lengths)?;

    let total = literal_codes + distance_codes;
    let mut lengths = vec![0u8; total];
    let mut index = 0;

    while index < total {
        let symbol = read_symbol(reader, &code_length_table, invalid_code_length)?;

        let (value, run) = match symbol {
            0..=15 => (symbol as u8, 1),
            16 => {
                if index == 0 {
                    return Err(FormatError::RepeatWithoutPrevious);
                }
                (lengths[index - 1], 3 + reader.read_bits(2)? as usize)
            }
            17 => (0, 3 + reader.read_bits(3)? as usize),
            18 => (0, 11 + reader.read_bits(7)? as usize),
            _ => return Err(invalid_code_length(reader.bit_position())),
        };

        if index + run > total {
            return Err(FormatError::CodeLengthOverflow { index, run, total });
        }
        lengths[index..index + run].fill(value);
        index += run;
    }

    let literal_table = HuffmanTable::from_lengths(&lengths[..literal_codes])?;
    let distance_table = HuffmanTable::from_lengths(&lengths[literal_codes..])?;
    Ok((literal_table, distance_table))
}
