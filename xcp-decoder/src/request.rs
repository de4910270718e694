//! Request decoders
//!
//! One function per command. Each appends the command's fixed fields to a
//! [`Fields`] list and returns how many bytes the layout covers. Commands
//! that carry a variable data block name it themselves (`key`, `elements`,
//! `parameters`) and report the whole frame as consumed.

use crate::fields::Fields;
use crate::formatters;
use crate::payload::Payload;

/// Append `label: [ .. ]` for the bytes from `offset` on
fn data_block(p: &Payload<'_>, f: &mut Fields, label: &str, offset: usize) -> usize {
    f.trailer(Some(label), p.bytes(), offset);
    p.len().max(offset)
}

/// Commands whose only byte is the command code
pub fn no_params(_p: &Payload<'_>, _f: &mut Fields) -> usize {
    1
}

/// Level 1 commands without parameters beyond the sub-command byte
pub fn level1_no_params(_p: &Payload<'_>, _f: &mut Fields) -> usize {
    2
}

pub fn connect(p: &Payload<'_>, f: &mut Fields) -> usize {
    f.with("mode", p.byte(1), formatters::connect_mode);
    2
}

pub fn get_id(p: &Payload<'_>, f: &mut Fields) -> usize {
    f.field("requestedIdentificationType", p.byte(1));
    2
}

pub fn set_request(p: &Payload<'_>, f: &mut Fields) -> usize {
    f.with("mode", p.byte(1), formatters::set_request_mode);
    f.field("sessionConfigurationId", p.word(2));
    4
}

pub fn get_seed(p: &Payload<'_>, f: &mut Fields) -> usize {
    let mode = p.byte(1);
    f.with("mode", mode, formatters::seed_mode);
    match mode {
        // The resource is only meaningful in the first GET_SEED of a sequence
        Some(0) => f.with("resource", p.byte(2), formatters::resources),
        Some(_) => f.field("resource", p.byte(2).map(|_| "\"Don't care\"")),
        None => f.truncated("resource"),
    }
    3
}

pub fn unlock(p: &Payload<'_>, f: &mut Fields) -> usize {
    f.field("length", p.byte(1));
    data_block(p, f, "key", 2)
}

pub fn set_mta(p: &Payload<'_>, f: &mut Fields) -> usize {
    f.hex32("address", p.dword(4));
    f.hex8("addressExtension", p.byte(3));
    8
}

pub fn upload(p: &Payload<'_>, f: &mut Fields) -> usize {
    f.field("numberOfDataElements", p.byte(1));
    2
}

pub fn short_upload(p: &Payload<'_>, f: &mut Fields) -> usize {
    f.field("numberOfDataElements", p.byte(1));
    f.hex32("address", p.dword(4));
    f.hex8("addressExtension", p.byte(3));
    8
}

pub fn build_checksum(p: &Payload<'_>, f: &mut Fields) -> usize {
    f.hex32("blockSize", p.dword(4));
    8
}

/// TRANSPORT_LAYER_CMD and USER_CMD
pub fn sub_command(p: &Payload<'_>, f: &mut Fields) -> usize {
    f.field("subCommandCode", p.byte(1));
    data_block(p, f, "parameters", 2)
}

/// DOWNLOAD, DOWNLOAD_NEXT, PROGRAM and PROGRAM_NEXT
pub fn data_elements(p: &Payload<'_>, f: &mut Fields) -> usize {
    f.field("numberOfDataElements", p.byte(1));
    data_block(p, f, "elements", 2)
}

/// DOWNLOAD_MAX and PROGRAM_MAX
pub fn max_elements(p: &Payload<'_>, f: &mut Fields) -> usize {
    data_block(p, f, "elements", 1)
}

pub fn short_download(p: &Payload<'_>, f: &mut Fields) -> usize {
    f.field("numberOfDataElements", p.byte(1));
    f.hex32("address", p.dword(4));
    f.hex8("addressExtension", p.byte(3));
    data_block(p, f, "elements", 8)
}

pub fn modify_bits(p: &Payload<'_>, f: &mut Fields) -> usize {
    f.field("shiftValue", p.byte(1));
    f.hex16("andMask", p.word(2));
    f.hex16("xorMask", p.word(4));
    6
}

pub fn set_cal_page(p: &Payload<'_>, f: &mut Fields) -> usize {
    f.with("mode", p.byte(1), formatters::cal_page_mode);
    f.field("logicalDataSegmentNumber", p.byte(2));
    f.field("logicalDataPageNumber", p.byte(3));
    4
}

pub fn get_cal_page(p: &Payload<'_>, f: &mut Fields) -> usize {
    f.with("mode", p.byte(1), formatters::cal_page_mode);
    f.field("logicalDataSegmentNumber", p.byte(2));
    3
}

pub fn get_segment_info(p: &Payload<'_>, f: &mut Fields) -> usize {
    let mode = p.byte(1);
    f.with("mode", mode, formatters::segment_info_mode);
    f.field("segmentNumber", p.byte(2));
    match mode {
        // SEGMENT_INFO is "don't care" in mode 1
        Some(1) => {}
        Some(mode) => f.with("segmentInfo", p.byte(3), |info| {
            formatters::segment_info_selector(mode, info)
        }),
        None => f.truncated("segmentInfo"),
    }
    if mode == Some(2) {
        f.field("mappingIndex", p.byte(4));
    }
    5
}

pub fn get_page_info(p: &Payload<'_>, f: &mut Fields) -> usize {
    f.field("segmentNumber", p.byte(2));
    f.field("pageNumber", p.byte(3));
    4
}

pub fn set_segment_mode(p: &Payload<'_>, f: &mut Fields) -> usize {
    f.with("segmentMode", p.byte(1), formatters::segment_mode);
    f.field("segmentNumber", p.byte(2));
    3
}

pub fn get_segment_mode(p: &Payload<'_>, f: &mut Fields) -> usize {
    f.field("segmentNumber", p.byte(2));
    3
}

pub fn copy_cal_page(p: &Payload<'_>, f: &mut Fields) -> usize {
    f.field("logicalDataSegmentNumberSource", p.byte(1));
    f.field("logicalDataPageNumberSource", p.byte(2));
    f.field("logicalDataSegmentNumberDestination", p.byte(3));
    f.field("logicalDataPageNumberDestination", p.byte(4));
    5
}

/// CLEAR_DAQ_LIST, GET_DAQ_LIST_MODE, GET_DAQ_LIST_INFO and GET_DAQ_PACKED_MODE
pub fn daq_list_number(p: &Payload<'_>, f: &mut Fields) -> usize {
    f.field("daqListNumber", p.word(2));
    4
}

pub fn set_daq_ptr(p: &Payload<'_>, f: &mut Fields) -> usize {
    f.field("daqListNumber", p.word(2));
    f.field("odtNumber", p.byte(4));
    f.field("odtEntryNumber", p.byte(5));
    6
}

pub fn write_daq(p: &Payload<'_>, f: &mut Fields) -> usize {
    f.field("bitOffset", p.byte(1));
    f.field("sizeofElement", p.byte(2));
    f.field("addressExtension", p.byte(3));
    f.hex32("adddress", p.dword(4));
    8
}

pub fn set_daq_list_mode(p: &Payload<'_>, f: &mut Fields) -> usize {
    f.with("mode", p.byte(1), formatters::daq_list_mode);
    f.field("daqListNumber", p.word(2));
    f.field("eventChannelNumber", p.word(4));
    f.field("transmissionRatePrescaler", p.byte(6));
    f.field("daqListPriority", p.byte(7));
    8
}

pub fn start_stop_daq_list(p: &Payload<'_>, f: &mut Fields) -> usize {
    f.with("mode", p.byte(1), formatters::start_stop_mode);
    f.field("daqListNumber", p.word(2));
    4
}

pub fn start_stop_synch(p: &Payload<'_>, f: &mut Fields) -> usize {
    f.with("mode", p.byte(1), formatters::start_stop_synch_mode);
    2
}

pub fn get_daq_event_info(p: &Payload<'_>, f: &mut Fields) -> usize {
    f.field("eventChannelNumber", p.word(2));
    4
}

pub fn alloc_daq(p: &Payload<'_>, f: &mut Fields) -> usize {
    f.field("daqCount", p.word(2));
    4
}

pub fn alloc_odt(p: &Payload<'_>, f: &mut Fields) -> usize {
    f.field("daqListNumber", p.word(2));
    f.field("odtCount", p.byte(4));
    5
}

pub fn alloc_odt_entry(p: &Payload<'_>, f: &mut Fields) -> usize {
    f.field("daqListNumber", p.word(2));
    f.field("odtNumber", p.byte(4));
    f.field("odtEntriesCount", p.byte(5));
    6
}

pub fn program_clear(p: &Payload<'_>, f: &mut Fields) -> usize {
    f.with("accessMode", p.byte(1), formatters::clear_access_mode);
    f.field("clearRange", p.dword(4));
    8
}

pub fn get_sector_info(p: &Payload<'_>, f: &mut Fields) -> usize {
    f.with("mode", p.byte(1), formatters::sector_info_mode);
    f.field("sectorNumber", p.byte(2));
    3
}

pub fn program_prepare(p: &Payload<'_>, f: &mut Fields) -> usize {
    f.field("Codesize[AG]", p.word(2));
    4
}

pub fn program_format(p: &Payload<'_>, f: &mut Fields) -> usize {
    f.field("compressionMethod", p.byte(1));
    f.field("encryptionMethod", p.byte(2));
    f.field("programmingMethod", p.byte(3));
    f.field("accessMethod", p.byte(4));
    5
}

pub fn program_verify(p: &Payload<'_>, f: &mut Fields) -> usize {
    f.with("verificationMode", p.byte(1), formatters::verification_mode);
    f.field("verificationType", p.word(2));
    f.field("verificationValue", p.dword(4));
    8
}

const DAQ_ELEMENT_SIZE: usize = 8;

pub fn write_daq_multiple(p: &Payload<'_>, f: &mut Fields) -> usize {
    let Some(count) = p.byte(1) else {
        f.truncated("elements");
        return 2;
    };

    let mut elements = Vec::new();
    for index in 0..usize::from(count) {
        let base = 2 + index * DAQ_ELEMENT_SIZE;
        let mut element = Fields::new();
        element.field("bitOffset", p.byte(base));
        element.field("sizeofElement", p.byte(base + 1));
        element.hex32("adddress", p.dword(base + 2));
        element.field("addressExtension", p.byte(base + 6));
        elements.push(format!("{{{}}}", element.join()));

        // Stop after the first element the frame cannot hold
        if base + DAQ_ELEMENT_SIZE > p.len() {
            break;
        }
    }
    f.push(format!("elements = [{}]", elements.join(", ")));
    2 + usize::from(count) * DAQ_ELEMENT_SIZE
}

pub fn time_correlation_properties(p: &Payload<'_>, f: &mut Fields) -> usize {
    f.hex8("setProperties", p.byte(1));
    f.hex8("getPropertiesRequest", p.byte(2));
    f.field("clusterId", p.word(4));
    6
}

pub fn dto_ctr_properties(p: &Payload<'_>, f: &mut Fields) -> usize {
    f.hex8("modifier", p.byte(1));
    f.field("eventChannelNumber", p.word(2));
    f.field("relatedEventChannelNumber", p.word(4));
    f.hex8("mode", p.byte(6));
    7
}

pub fn set_daq_packed_mode(p: &Payload<'_>, f: &mut Fields) -> usize {
    f.field("daqListNumber", p.word(2));
    let mode = p.byte(4);
    f.with("daqPackedMode", mode, formatters::daq_packed_mode);
    match mode {
        Some(0) => 5,
        _ => {
            f.with("dpmTimestampMode", p.byte(5), formatters::dpm_timestamp_mode);
            f.field("dpmSampleCount", p.word(6));
            8
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(decoder: fn(&Payload<'_>, &mut Fields) -> usize, data: &[u8]) -> (String, usize) {
        let mut fields = Fields::new();
        let consumed = decoder(&Payload::new(data), &mut fields);
        (fields.join(), consumed)
    }

    #[test]
    fn test_connect() {
        assert_eq!(decode(connect, &[0xFF, 0x00]), ("mode = NORMAL".to_string(), 2));
        assert_eq!(decode(connect, &[0xFF, 0x01]).0, "mode = USER_DEFINED");
        assert_eq!(decode(connect, &[0xFF]).0, "mode = <truncated>");
    }

    #[test]
    fn test_set_segment_mode() {
        assert_eq!(
            decode(set_segment_mode, &[0xE6, 0x01, 0x02]),
            ("segmentMode = { freeze = ENABLE }, segmentNumber = 2".to_string(), 3)
        );
        assert_eq!(
            decode(set_segment_mode, &[0xE6, 0x00]).0,
            "segmentMode = { freeze = DISABLE }, segmentNumber = <truncated>"
        );
    }

    #[test]
    fn test_set_mta_prints_address_first() {
        let (text, consumed) = decode(set_mta, &[0xF6, 0x00, 0x00, 0x01, 0x78, 0x56, 0x34, 0x12]);
        assert_eq!(text, "address = 0x12345678, addressExtension = 0x01");
        assert_eq!(consumed, 8);
    }

    #[test]
    fn test_unlock_names_its_key() {
        let (text, consumed) = decode(unlock, &[0xF7, 0x04, 0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(text, "length = 4, key: [ DE AD BE EF ]");
        assert_eq!(consumed, 6);

        let (text, consumed) = decode(unlock, &[0xF7, 0x00]);
        assert_eq!(text, "length = 0");
        assert_eq!(consumed, 2);
    }

    #[test]
    fn test_get_seed_resource_only_in_first_part() {
        let (text, _) = decode(get_seed, &[0xF8, 0x00, 0x01]);
        assert_eq!(text, "mode = \"first part of seed\", resource = { CAL_PAG }");

        let (text, _) = decode(get_seed, &[0xF8, 0x01, 0x01]);
        assert_eq!(text, "mode = \"remaining part of seed\", resource = \"Don't care\"");
    }

    #[test]
    fn test_modify_bits_masks_are_hex() {
        let (text, consumed) = decode(modify_bits, &[0xEC, 0x03, 0xFF, 0x00, 0x0F, 0x00]);
        assert_eq!(text, "shiftValue = 3, andMask = 0x00ff, xorMask = 0x000f");
        assert_eq!(consumed, 6);
    }

    #[test]
    fn test_set_daq_list_mode_prescaler_is_a_byte() {
        let (text, consumed) =
            decode(set_daq_list_mode, &[0xE0, 0x10, 0x02, 0x00, 0x01, 0x00, 0x05, 0x07]);
        assert_eq!(
            text,
            "mode = { TIMESTAMP }, daqListNumber = 2, eventChannelNumber = 1, transmissionRatePrescaler = 5, daqListPriority = 7"
        );
        assert_eq!(consumed, 8);
    }

    #[test]
    fn test_alloc_odt_count_is_a_byte() {
        let (text, consumed) = decode(alloc_odt, &[0xD4, 0x00, 0x03, 0x00, 0x04]);
        assert_eq!(text, "daqListNumber = 3, odtCount = 4");
        assert_eq!(consumed, 5);
    }

    #[test]
    fn test_get_segment_info_modes() {
        let (text, consumed) = decode(get_segment_info, &[0xE8, 0x00, 0x01, 0x01, 0x00]);
        assert_eq!(
            text,
            "mode = 0 [\"get basic address info for this SEGMENT\"], segmentNumber = 1, segmentInfo = \"length\""
        );
        assert_eq!(consumed, 5);

        let (text, _) = decode(get_segment_info, &[0xE8, 0x01, 0x02, 0x00, 0x00]);
        assert_eq!(text, "mode = 1 [\"get standard info for this SEGMENT\"], segmentNumber = 2");

        let (text, _) = decode(get_segment_info, &[0xE8, 0x02, 0x00, 0x02, 0x03]);
        assert!(text.ends_with("segmentInfo = \"lengthAddress\", mappingIndex = 3"));
    }

    #[test]
    fn test_write_daq_multiple_elements() {
        let data = [
            0xC7, 0x01, 0x00, 0x04, 0x00, 0x10, 0x00, 0x20, 0x00, 0x00,
        ];
        let (text, consumed) = decode(write_daq_multiple, &data);
        assert_eq!(
            text,
            "elements = [{bitOffset = 0, sizeofElement = 4, adddress = 0x20001000, addressExtension = 0}]"
        );
        assert_eq!(consumed, 10);
    }

    #[test]
    fn test_write_daq_multiple_stops_at_end_of_frame() {
        let (text, _) = decode(write_daq_multiple, &[0xC7, 0x05, 0xFF, 0x02]);
        assert_eq!(
            text,
            "elements = [{bitOffset = 255, sizeofElement = 2, adddress = <truncated>, addressExtension = <truncated>}]"
        );
    }

    #[test]
    fn test_set_daq_packed_mode_optional_fields() {
        let (text, consumed) = decode(set_daq_packed_mode, &[0xC0, 0x01, 0x03, 0x00, 0x00]);
        assert_eq!(text, "daqListNumber = 3, daqPackedMode = NOT_PACKED");
        assert_eq!(consumed, 5);

        let (text, consumed) =
            decode(set_daq_packed_mode, &[0xC0, 0x01, 0x03, 0x00, 0x01, 0x00, 0x0A, 0x00]);
        assert_eq!(
            text,
            "daqListNumber = 3, daqPackedMode = ELEMENT_GROUPED, dpmTimestampMode = SINGLE_TIMESTAMP_OF_FIRST_SAMPLE, dpmSampleCount = 10"
        );
        assert_eq!(consumed, 8);
    }

    #[test]
    fn test_truncated_fields_do_not_read_past_frame() {
        let (text, consumed) = decode(program_verify, &[0xC8, 0x01]);
        assert_eq!(
            text,
            "verificationMode = \"sending Verification Value\", verificationType = <truncated>, verificationValue = <truncated>"
        );
        assert_eq!(consumed, 8);
    }
}
