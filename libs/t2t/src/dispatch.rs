use crate::convert;
use crate::error::TransferError;
use crate::kind::Kind;
use crate::transformer::Transformer;
use crate::value::Transferable;

/// Converter for one (source kind, destination kind) pair.
pub type Converter = fn(&Transformer, &dyn Transferable, &mut dyn Transferable) -> Result<(), TransferError>;

/// Find the converter for a kind pair.
///
/// Both kinds are canonicalized first. A pair without an exact entry falls
/// back to the source row's `Any` entry; `None` means the kinds are
/// incompatible.
pub fn lookup(input: Kind, output: Kind) -> Option<Converter> {
    let (input, output) = (input.canonical(), output.canonical());
    exact(input, output).or_else(|| exact(input, Kind::Any))
}

fn exact(input: Kind, output: Kind) -> Option<Converter> {
    let converter: Converter = match (input, output) {
        // literals
        (Kind::Bool | Kind::String | Kind::I64 | Kind::U64 | Kind::F64, Kind::Dynamic) => {
            convert::literal_to_dynamic
        }
        (Kind::Bool, Kind::Bool) => convert::bool_to_bool,

        (Kind::String, Kind::String) => convert::string_to_string,
        (Kind::String, Kind::I64) => convert::string_to_int,
        (Kind::String, Kind::U64) => convert::string_to_uint,
        (Kind::String, Kind::F64) => convert::string_to_float,

        (Kind::I64, Kind::I64) => convert::int_to_int,
        (Kind::I64, Kind::U64) => convert::int_to_uint,
        (Kind::I64, Kind::F64) => convert::int_to_float,
        (Kind::I64, Kind::String) => convert::number_to_string,

        (Kind::U64, Kind::I64) => convert::uint_to_int,
        (Kind::U64, Kind::U64) => convert::uint_to_uint,
        (Kind::U64, Kind::F64) => convert::uint_to_float,
        (Kind::U64, Kind::String) => convert::number_to_string,

        (Kind::F64, Kind::F64) => convert::float_to_float,
        (Kind::F64, Kind::I64) => convert::float_to_int,
        (Kind::F64, Kind::U64) => convert::float_to_uint,
        (Kind::F64, Kind::String) => convert::number_to_string,

        // sequences
        (Kind::Seq | Kind::Array, Kind::Dynamic) => convert::seq_to_dynamic,
        (Kind::Seq | Kind::Array, Kind::Seq) => convert::seq_to_seq,
        (Kind::Seq | Kind::Array, Kind::Array) => convert::array_to_array,
        (Kind::Seq | Kind::Array, Kind::Record) => convert::seq_to_record,

        // maps
        (Kind::Map, Kind::Dynamic) => convert::map_to_dynamic,
        (Kind::Map, Kind::Map) => convert::map_to_map,
        (Kind::Map, Kind::Record) => convert::map_to_record,

        // records
        (Kind::Record, Kind::Dynamic) => convert::record_to_dynamic,
        (Kind::Record, Kind::Map) => convert::record_to_map,
        (Kind::Record, Kind::Record) => convert::record_to_record,
        (Kind::Record, Kind::Seq | Kind::Array) => convert::record_to_seq,

        // indirection
        (Kind::Ref, Kind::Any) => convert::deref,
        (Kind::Dynamic, Kind::Any) => convert::unwrap_dynamic,

        _ => return None,
    };
    Some(converter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_share_a_row() {
        assert!(lookup(Kind::I8, Kind::U16).is_some());
        assert!(lookup(Kind::F32, Kind::Isize).is_some());
        assert!(lookup(Kind::Usize, Kind::String).is_some());
    }

    #[test]
    fn wildcard_rows() {
        for output in [Kind::Bool, Kind::Record, Kind::Seq, Kind::Dynamic, Kind::U8] {
            assert!(lookup(Kind::Ref, output).is_some());
            assert!(lookup(Kind::Dynamic, output).is_some());
        }
    }

    #[test]
    fn missing_pairs() {
        assert!(lookup(Kind::Bool, Kind::String).is_none());
        assert!(lookup(Kind::Bool, Kind::I64).is_none());
        assert!(lookup(Kind::Map, Kind::Seq).is_none());
        assert!(lookup(Kind::Seq, Kind::Map).is_none());
        assert!(lookup(Kind::String, Kind::Record).is_none());
        assert!(lookup(Kind::Record, Kind::String).is_none());
    }
}
