//! Field formatters for XCP bitfields and enumerations
//!
//! Each function turns one raw byte into the symbolic text that follows
//! `name = ` in the dissected output. The functions are pure and total:
//! reserved or undefined bit patterns render as `"INVALID"` or
//! `"not allowed"` rather than failing.

use crate::protocol::*;

const INVALID: &str = "\"INVALID\"";

fn flag(set: bool) -> &'static str {
    if set {
        "TRUE"
    } else {
        "FALSE"
    }
}

fn request_flag(set: bool) -> &'static str {
    if set {
        "SET"
    } else {
        "RESET"
    }
}

/// Collect the names of the set bits as `{ A B }`
fn bit_names(value: u8, names: &[(u8, &str)]) -> String {
    let mut out = String::from("{");
    for (mask, name) in names {
        if value & mask != 0 {
            out.push(' ');
            out.push_str(name);
        }
    }
    out.push_str(" }");
    out
}

/// Resource bits (CONNECT resources, GET_STATUS/UNLOCK protection status)
pub fn resources(value: u8) -> String {
    bit_names(
        value,
        &[
            (RESOURCE_CAL_PAG, "CAL_PAG"),
            (RESOURCE_DAQ, "DAQ"),
            (RESOURCE_STIM, "STIM"),
            (RESOURCE_PGM, "PGM"),
        ],
    )
}

/// COMM_MODE_BASIC from the CONNECT response
pub fn comm_mode_basic(mode: u8) -> String {
    let byte_order = if mode & COMM_MODE_BYTE_ORDER_MOTOROLA != 0 {
        "MOTOROLA"
    } else {
        "INTEL"
    };
    let granularity = match (mode & COMM_MODE_ADDRESS_GRANULARITY) >> 1 {
        0 => "BYTE",
        1 => "WORD",
        2 => "DWORD",
        _ => INVALID,
    };
    format!(
        "{{byteOrder = {}, AG = {}, slaveBlockMode = {}, optional = {}}}",
        byte_order,
        granularity,
        flag(mode & COMM_MODE_SLAVE_BLOCK_MODE != 0),
        flag(mode & COMM_MODE_OPTIONAL != 0)
    )
}

/// COMM_MODE_OPTIONAL from the GET_COMM_MODE_INFO response
pub fn comm_mode_optional(mode: u8) -> String {
    format!(
        "{{masterBlockMode = {}, interleavedMode = {}}}",
        flag(mode & COMM_MODE_MASTER_BLOCK_MODE != 0),
        flag(mode & COMM_MODE_INTERLEAVED_MODE != 0)
    )
}

/// Current session status from the GET_STATUS response
pub fn session_status(status: u8) -> String {
    format!(
        "{{storeCalReq = {}, storeDaqReq = {}, clearCalReq = {}, daqRunning = {}, resume = {}}}",
        request_flag(status & SESSION_STORE_CAL_REQ != 0),
        request_flag(status & SESSION_STORE_DAQ_REQ != 0),
        request_flag(status & SESSION_CLEAR_DAQ_REQ != 0),
        flag(status & SESSION_DAQ_RUNNING != 0),
        flag(status & SESSION_RESUME != 0)
    )
}

/// SET_REQUEST mode bits
pub fn set_request_mode(mode: u8) -> String {
    format!(
        "{{clearDaqReq = {}, storeDaqReqResume = {}, storeDaqReqNoResume = {}, storeCalReq = {}}}",
        flag(mode & SET_REQUEST_CLEAR_DAQ_REQ != 0),
        flag(mode & SET_REQUEST_STORE_DAQ_REQ_RESUME != 0),
        flag(mode & SET_REQUEST_STORE_DAQ_REQ_NO_RESUME != 0),
        flag(mode & SET_REQUEST_STORE_CAL_REQ != 0)
    )
}

/// GET_ID response mode bits
pub fn get_id_mode(mode: u8) -> String {
    format!(
        "{{compressedEncrypted = {}, transferMode = {}}}",
        flag(mode & GET_ID_COMPRESSED_ENCRYPTED != 0),
        flag(mode & GET_ID_TRANSFER_MODE != 0)
    )
}

/// BUILD_CHECKSUM checksum type
pub fn checksum_method(method: u8) -> String {
    let name = match method {
        0x01 => "XCP_ADD_11",
        0x02 => "XCP_ADD_12",
        0x03 => "XCP_ADD_14",
        0x04 => "XCP_ADD_22",
        0x05 => "XCP_ADD_24",
        0x06 => "XCP_ADD_44",
        0x07 => "XCP_CRC_16",
        0x08 => "XCP_CRC_16_CITT",
        0x09 => "XCP_CRC_32",
        0xFF => "USER_DEFINED",
        _ => INVALID,
    };
    format!("{{ {} }}", name)
}

/// SET_CAL_PAGE / GET_CAL_PAGE access mode
pub fn cal_page_mode(mode: u8) -> String {
    bit_names(
        mode,
        &[(CAL_PAGE_ALL, "ALL"), (CAL_PAGE_XCP, "XCP"), (CAL_PAGE_ECU, "ECU")],
    )
}

/// PAG_PROPERTIES from the GET_PAG_PROCESSOR_INFO response
pub fn pag_properties(properties: u8) -> String {
    bit_names(properties, &[(PAG_FREEZE_SUPPORTED, "FREEZE_SUPPORTED")])
}

/// PAGE_PROPERTIES from the GET_PAGE_INFO response
pub fn page_properties(properties: u8) -> String {
    let ecu_access = match properties & 0x03 {
        0 => "\"ECU access not allowed\"",
        1 => "\"without XCP only\"",
        2 => "\"with XCP only\"",
        _ => "\"with or without XCP\"",
    };
    let read_access = match (properties >> 2) & 0x03 {
        0 => "\"XCP READ access not allowed\"",
        1 => "\"without ECU only\"",
        2 => "\"with ECU only\"",
        _ => "\"with or without ECU\"",
    };
    let write_access = match (properties >> 4) & 0x03 {
        0 => "\"XCP WRITE access not allowed\"",
        1 => "\"without ECU only\"",
        2 => "\"with ECU only\"",
        _ => "\"with or without ECU\"",
    };
    format!(
        "{{ ecuAccessType = {}, xcpReadAccessType = {}, xcpWriteAccessType = {} }}",
        ecu_access, read_access, write_access
    )
}

/// SEGMENT_MODE of SET_SEGMENT_MODE and the GET_SEGMENT_MODE response
pub fn segment_mode(mode: u8) -> String {
    let freeze = if mode & SEGMENT_MODE_FREEZE != 0 {
        "ENABLE"
    } else {
        "DISABLE"
    };
    format!("{{ freeze = {} }}", freeze)
}

/// SET_DAQ_LIST_MODE mode bits
pub fn daq_list_mode(mode: u8) -> String {
    bit_names(
        mode,
        &[
            (DAQ_LIST_MODE_ALTERNATING, "ALTERNATING"),
            (DAQ_LIST_MODE_DIRECTION, "DIRECTION"),
            (DAQ_LIST_MODE_TIMESTAMP, "TIMESTAMP"),
            (DAQ_LIST_MODE_PID_OFF, "PID_OFF"),
        ],
    )
}

/// Current mode from the GET_DAQ_LIST_MODE response
pub fn daq_current_list_mode(mode: u8) -> String {
    let resume = if mode & DAQ_CURRENT_RESUME != 0 {
        "list is part of a RESUME configuration"
    } else {
        "list is NOT part of a RESUME configuration"
    };
    let running = if mode & DAQ_CURRENT_RUNNING != 0 {
        "DAQ list is active"
    } else {
        "DAQ list is inactive"
    };
    let direction = if mode & DAQ_CURRENT_DIRECTION != 0 {
        "STIM"
    } else {
        "DAQ"
    };
    format!(
        "{{resume = \"{}\", running = \"{}\", packetIdentifierTransmitted = {}, timestamp = {}, direction = {}, selected = {} }}",
        resume,
        running,
        flag(mode & DAQ_CURRENT_PID_OFF == 0),
        flag(mode & DAQ_CURRENT_TIMESTAMP != 0),
        direction,
        flag(mode & DAQ_CURRENT_SELECTED != 0)
    )
}

/// DAQ_PROPERTIES from the GET_DAQ_PROCESSOR_INFO response
pub fn daq_properties(properties: u8) -> String {
    let config_type = if properties & DAQ_PROP_CONFIG_TYPE_DYNAMIC != 0 {
        "DYNAMIC"
    } else {
        "STATIC"
    };
    let overload = match (properties & DAQ_PROP_OVERLOAD_INDICATION) >> 6 {
        0 => "\"no overload indication\"",
        1 => "\"overload indication in MSB of PID\"",
        2 => "\"overload indication by Event Packet\"",
        _ => "\"not allowed\"",
    };
    format!(
        "{{daqConfigType = {}, prescalerSupported = {}, resumeSupported = {}, bitStimSupported = {}, timestampSupported = {}, pidOffSupported = {}, overloadIndicationType = {}}}",
        config_type,
        flag(properties & DAQ_PROP_PRESCALER_SUPPORTED != 0),
        flag(properties & DAQ_PROP_RESUME_SUPPORTED != 0),
        flag(properties & DAQ_PROP_BIT_STIM_SUPPORTED != 0),
        flag(properties & DAQ_PROP_TIMESTAMP_SUPPORTED != 0),
        flag(properties & DAQ_PROP_PID_OFF_SUPPORTED != 0),
        overload
    )
}

/// DAQ_KEY_BYTE from the GET_DAQ_PROCESSOR_INFO response
pub fn daq_key_byte(key: u8) -> String {
    let optimisation = match key & DAQ_KEY_OPTIMISATION {
        0 => "OM_DEFAULT",
        1 => "OM_ODT_TYPE_16",
        2 => "OM_ODT_TYPE_32",
        3 => "OM_ODT_TYPE_64",
        4 => "OM_ODT_TYPE_ALIGNMENT",
        5 => "OM_MAX_ENTRY_SIZE",
        _ => INVALID,
    };
    let address_extension = match (key & DAQ_KEY_ADDRESS_EXTENSION) >> 4 {
        0 => "\"address extension can be different within one and the same ODT\"",
        1 => "\"address extension to be the same for all entries within one ODT\"",
        2 => "\"Not allowed\"",
        _ => "\"address extension to be the same for all entries within one DAQ\"",
    };
    let identification_field = match (key & DAQ_KEY_IDENTIFICATION_FIELD) >> 6 {
        0 => "\"Absolute ODT number\"",
        1 => "\"Relative ODT number, absolute DAQ list number (BYTE)\"",
        2 => "\"Relative ODT number, absolute DAQ list number (WORD)\"",
        _ => "\"Relative ODT number, absolute DAQ list number (WORD, aligned)\"",
    };
    format!(
        "{{optimisationType = {}, addressExtensionType = {}, identificationFieldType = {}}}",
        optimisation, address_extension, identification_field
    )
}

/// Time unit code shared by the timestamp mode and event channel info
pub fn time_unit(unit: u8) -> String {
    let text = match unit {
        0 => "1ns",
        1 => "10ns",
        2 => "100ns",
        3 => "1us",
        4 => "10us",
        5 => "100us",
        6 => "1ms",
        7 => "10ms",
        8 => "100ms",
        9 => "1s",
        10 => "1ps",
        11 => "10ps",
        12 => "100ps",
        _ => INVALID,
    };
    text.to_string()
}

/// TIMESTAMP_MODE from the GET_DAQ_RESOLUTION_INFO response
pub fn daq_timestamp_mode(mode: u8) -> String {
    let size = match mode & TIMESTAMP_MODE_SIZE {
        0 => "\"no timestamp\"",
        1 => "1",
        2 => "2",
        3 => "\"not allowed\"",
        4 => "4",
        _ => INVALID,
    };
    format!(
        "{{size = {}, unit = {}, fixed = {}}}",
        size,
        time_unit((mode & TIMESTAMP_MODE_UNIT) >> 4),
        flag(mode & TIMESTAMP_MODE_FIXED != 0)
    )
}

/// DAQ_EVENT_PROPERTIES from the GET_DAQ_EVENT_INFO response
pub fn daq_event_properties(properties: u8) -> String {
    let channel_type = match (properties & EVENT_CHANNEL_TYPE) >> 2 {
        0 => "\"not allowed\"",
        1 => "\"DIRECTION = DAQ only\"",
        2 => "\"DIRECTION = STIM only\"",
        _ => "\"DIRECTION DAQ and STIM\"",
    };
    let consistency = match (properties & EVENT_CONSISTENCY) >> 6 {
        0 => "\"ODT level consistency\"",
        1 => "\"DAQ list level consistency\"",
        2 => "\"Event Channel level consistency\"",
        _ => "\"not allowed\"",
    };
    format!(
        "{{eventChannelType = {}, consistency = {} }}",
        channel_type, consistency
    )
}

/// DAQ_LIST_PROPERTIES from the GET_DAQ_LIST_INFO response
pub fn daq_list_properties(properties: u8) -> String {
    let configuration = if properties & DAQ_LIST_PREDEFINED != 0 {
        "PREDEFINED"
    } else {
        "CHANGEABLE"
    };
    let assignment = if properties & DAQ_LIST_EVENT_FIXED != 0 {
        "FIXED"
    } else {
        "CHANGEABLE"
    };
    let list_type = match (properties & DAQ_LIST_TYPE) >> 2 {
        0 => "\"Not allowed\"",
        1 => "\"DIRECTION = DAQ only\"",
        2 => "\"DIRECTION = STIM only\"",
        _ => "\"DIRECTION DAQ or STIM\"",
    };
    format!(
        "{{configurationType = {}, eventChannelAssignment = {}, daqListType = {}}}",
        configuration, assignment, list_type
    )
}

/// COMM_MODE_PGM from the PROGRAM_START response
pub fn pgm_comm_mode(mode: u8) -> String {
    format!(
        "{{interleavedMode = {}, masterBlockmode = {}, slaveBlockmode = {}}}",
        flag(mode & PGM_INTERLEAVED_MODE != 0),
        flag(mode & PGM_MASTER_BLOCK_MODE != 0),
        flag(mode & PGM_SLAVE_BLOCK_MODE != 0)
    )
}

/// PGM_PROPERTIES from the GET_PGM_PROCESSOR_INFO response
pub fn pgm_properties(properties: u8) -> String {
    fn support(bits: u8) -> &'static str {
        match bits {
            0 => "\"not supported\"",
            1 => "\"supported\"",
            _ => "\"supported and required\"",
        }
    }

    let clear_mode = match properties & PGM_CLEAR_MODE {
        0 => "\"Not allowed\"",
        1 => "\"Only ABSOLUTE\"",
        2 => "\"Only FUNCTIONAL\"",
        _ => "\"ABSOLUTE and FUNCTIONAL \"",
    };
    format!(
        "{{clearPprogrammingMode = {}, compression = {}, encryption = {}, nonSequentialProgramming = {}}}",
        clear_mode,
        support((properties & PGM_COMPRESSION) >> 2),
        support((properties & PGM_ENCRYPTION) >> 4),
        support((properties & PGM_NON_SEQ_PGM) >> 6)
    )
}

/// CONNECT mode
pub fn connect_mode(mode: u8) -> String {
    match mode {
        0 => "NORMAL".to_string(),
        1 => "USER_DEFINED".to_string(),
        _ => INVALID.to_string(),
    }
}

/// GET_SEED mode
pub fn seed_mode(mode: u8) -> String {
    match mode {
        0 => "\"first part of seed\"".to_string(),
        1 => "\"remaining part of seed\"".to_string(),
        _ => INVALID.to_string(),
    }
}

/// GET_SEGMENT_INFO mode
pub fn segment_info_mode(mode: u8) -> String {
    let text = match mode {
        0 => "get basic address info for this SEGMENT",
        1 => "get standard info for this SEGMENT",
        2 => "get address mapping info for this SEGMENT",
        _ => "*** INVALID ***",
    };
    format!("{} [\"{}\"]", mode, text)
}

/// GET_SEGMENT_INFO segment info selector, meaning depends on the mode
pub fn segment_info_selector(mode: u8, info: u8) -> String {
    let text = match (mode, info) {
        (0, 0) => "address",
        (0, 1) => "length",
        (2, 0) => "sourceAddress",
        (2, 1) => "destinationAddress",
        (2, 2) => "lengthAddress",
        _ => return INVALID.to_string(),
    };
    format!("\"{}\"", text)
}

/// START_STOP_DAQ_LIST mode
pub fn start_stop_mode(mode: u8) -> String {
    match mode {
        0 => "STOP".to_string(),
        1 => "START".to_string(),
        2 => "SELECT".to_string(),
        _ => INVALID.to_string(),
    }
}

/// START_STOP_SYNCH mode
pub fn start_stop_synch_mode(mode: u8) -> String {
    match mode {
        0 => "STOP_ALL".to_string(),
        1 => "START_SELECTED".to_string(),
        2 => "STOP_SELECTED".to_string(),
        3 => "PREPARE_START_SELECTED".to_string(),
        _ => INVALID.to_string(),
    }
}

/// PROGRAM_CLEAR access mode
pub fn clear_access_mode(mode: u8) -> String {
    match mode {
        0 => "ABSOLUTE".to_string(),
        1 => "FUNCTIONAL".to_string(),
        _ => INVALID.to_string(),
    }
}

/// GET_SECTOR_INFO mode
pub fn sector_info_mode(mode: u8) -> String {
    match mode {
        0 => "\"get start address for this SECTOR\"".to_string(),
        1 => "\"get length of this SECTOR[bytes]\"".to_string(),
        2 => "\"get name length of this SECTOR\"".to_string(),
        _ => INVALID.to_string(),
    }
}

/// PROGRAM_VERIFY verification mode
pub fn verification_mode(mode: u8) -> String {
    match mode {
        0 => "\"request to start internal routine\"".to_string(),
        1 => "\"sending Verification Value\"".to_string(),
        _ => INVALID.to_string(),
    }
}

/// EV_STIM_TIMEOUT info type
pub fn stim_timeout_type(kind: u8) -> String {
    match kind {
        0 => "EVENT_CHANNEL_NUMBER".to_string(),
        1 => "DAQ LIST NUMBER".to_string(),
        _ => INVALID.to_string(),
    }
}

/// DAQ_PACKED_MODE of SET/GET_DAQ_PACKED_MODE
pub fn daq_packed_mode(mode: u8) -> String {
    match mode {
        0 => "NOT_PACKED".to_string(),
        1 => "ELEMENT_GROUPED".to_string(),
        2 => "EVENT_GROUPED".to_string(),
        _ => INVALID.to_string(),
    }
}

/// DPM timestamp mode of SET/GET_DAQ_PACKED_MODE
pub fn dpm_timestamp_mode(mode: u8) -> String {
    match mode {
        0 => "SINGLE_TIMESTAMP_OF_FIRST_SAMPLE".to_string(),
        1 => "SINGLE_TIMESTAMP_OF_LAST_SAMPLE".to_string(),
        _ => INVALID.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resources() {
        assert_eq!(resources(0x05), "{ CAL_PAG DAQ }");
        assert_eq!(resources(0x1D), "{ CAL_PAG DAQ STIM PGM }");
        assert_eq!(resources(0x00), "{ }");
        // Reserved bits are ignored
        assert_eq!(resources(0xE2), "{ }");
    }

    #[test]
    fn test_comm_mode_basic() {
        assert_eq!(
            comm_mode_basic(0x00),
            "{byteOrder = INTEL, AG = BYTE, slaveBlockMode = FALSE, optional = FALSE}"
        );
        assert_eq!(
            comm_mode_basic(0xC3),
            "{byteOrder = MOTOROLA, AG = WORD, slaveBlockMode = TRUE, optional = TRUE}"
        );
        assert!(comm_mode_basic(0x04).contains("AG = DWORD"));
        assert!(comm_mode_basic(0x06).contains("AG = \"INVALID\""));
    }

    #[test]
    fn test_session_status() {
        assert_eq!(
            session_status(0x45),
            "{storeCalReq = SET, storeDaqReq = SET, clearCalReq = RESET, daqRunning = TRUE, resume = FALSE}"
        );
        assert!(session_status(0x88).contains("clearCalReq = SET"));
        assert!(session_status(0x88).contains("resume = TRUE"));
    }

    #[test]
    fn test_checksum_method() {
        assert_eq!(checksum_method(0x07), "{ XCP_CRC_16 }");
        assert_eq!(checksum_method(0xFF), "{ USER_DEFINED }");
        assert_eq!(checksum_method(0x0A), "{ \"INVALID\" }");
    }

    #[test]
    fn test_page_properties_fields_are_independent() {
        assert_eq!(
            page_properties(0x00),
            "{ ecuAccessType = \"ECU access not allowed\", xcpReadAccessType = \"XCP READ access not allowed\", xcpWriteAccessType = \"XCP WRITE access not allowed\" }"
        );
        let p = page_properties(0x26);
        assert!(p.contains("ecuAccessType = \"with XCP only\""));
        assert!(p.contains("xcpReadAccessType = \"without ECU only\""));
        assert!(p.contains("xcpWriteAccessType = \"with ECU only\""));
    }

    #[test]
    fn test_daq_properties() {
        let p = daq_properties(0x95);
        assert!(p.starts_with("{daqConfigType = DYNAMIC, prescalerSupported = FALSE, resumeSupported = TRUE"));
        assert!(p.contains("timestampSupported = TRUE"));
        assert!(p.ends_with("overloadIndicationType = \"overload indication by Event Packet\"}"));
        assert!(daq_properties(0xC0).contains("\"not allowed\""));
    }

    #[test]
    fn test_daq_key_byte() {
        assert_eq!(
            daq_key_byte(0x00),
            "{optimisationType = OM_DEFAULT, addressExtensionType = \"address extension can be different within one and the same ODT\", identificationFieldType = \"Absolute ODT number\"}"
        );
        let k = daq_key_byte(0x65);
        assert!(k.contains("optimisationType = OM_MAX_ENTRY_SIZE"));
        assert!(k.contains("addressExtensionType = \"Not allowed\""));
        assert!(k.contains("(BYTE)"));
        assert!(daq_key_byte(0x06).contains("optimisationType = \"INVALID\""));
    }

    #[test]
    fn test_timestamp_mode() {
        assert_eq!(daq_timestamp_mode(0x62), "{size = 2, unit = 1ms, fixed = FALSE}");
        assert_eq!(daq_timestamp_mode(0x0C), "{size = 4, unit = 1ns, fixed = TRUE}");
        assert_eq!(
            daq_timestamp_mode(0xD3),
            "{size = \"not allowed\", unit = \"INVALID\", fixed = FALSE}"
        );
        assert!(daq_timestamp_mode(0x05).contains("size = \"INVALID\""));
    }

    #[test]
    fn test_time_unit_table() {
        assert_eq!(time_unit(0), "1ns");
        assert_eq!(time_unit(9), "1s");
        assert_eq!(time_unit(12), "100ps");
        assert_eq!(time_unit(13), "\"INVALID\"");
    }

    #[test]
    fn test_daq_current_list_mode() {
        assert_eq!(
            daq_current_list_mode(0x00),
            "{resume = \"list is NOT part of a RESUME configuration\", running = \"DAQ list is inactive\", packetIdentifierTransmitted = TRUE, timestamp = FALSE, direction = DAQ, selected = FALSE }"
        );
        let m = daq_current_list_mode(0x63);
        assert!(m.contains("DAQ list is active"));
        assert!(m.contains("packetIdentifierTransmitted = FALSE"));
        assert!(m.contains("direction = STIM"));
        assert!(m.contains("selected = TRUE"));
    }

    #[test]
    fn test_event_and_list_properties() {
        assert_eq!(
            daq_event_properties(0x44),
            "{eventChannelType = \"DIRECTION = DAQ only\", consistency = \"DAQ list level consistency\" }"
        );
        assert!(daq_event_properties(0xC0).contains("consistency = \"not allowed\""));
        assert_eq!(
            daq_list_properties(0x0D),
            "{configurationType = PREDEFINED, eventChannelAssignment = CHANGEABLE, daqListType = \"DIRECTION DAQ or STIM\"}"
        );
    }

    #[test]
    fn test_pgm_formatters() {
        assert_eq!(
            pgm_comm_mode(0x41),
            "{interleavedMode = FALSE, masterBlockmode = TRUE, slaveBlockmode = TRUE}"
        );
        assert_eq!(
            pgm_properties(0x1D),
            "{clearPprogrammingMode = \"Only ABSOLUTE\", compression = \"supported and required\", encryption = \"supported\", nonSequentialProgramming = \"not supported\"}"
        );
    }

    #[test]
    fn test_bit_lists() {
        assert_eq!(cal_page_mode(0x83), "{ ALL XCP ECU }");
        assert_eq!(cal_page_mode(0x01), "{ ECU }");
        assert_eq!(daq_list_mode(0x30), "{ TIMESTAMP PID_OFF }");
        assert_eq!(pag_properties(0x01), "{ FREEZE_SUPPORTED }");
        assert_eq!(segment_mode(0x00), "{ freeze = DISABLE }");
    }

    #[test]
    fn test_enumerations_fall_back_to_invalid() {
        assert_eq!(connect_mode(0), "NORMAL");
        assert_eq!(connect_mode(7), "\"INVALID\"");
        assert_eq!(start_stop_mode(3), "\"INVALID\"");
        assert_eq!(start_stop_synch_mode(3), "PREPARE_START_SELECTED");
        assert_eq!(segment_info_mode(9), "9 [\"*** INVALID ***\"]");
        assert_eq!(segment_info_selector(0, 1), "\"length\"");
        assert_eq!(segment_info_selector(1, 0), "\"INVALID\"");
    }

    #[test]
    fn test_formatters_are_idempotent() {
        for value in 0..=u8::MAX {
            assert_eq!(daq_properties(value), daq_properties(value));
            assert_eq!(comm_mode_basic(value), comm_mode_basic(value));
            assert_eq!(pgm_properties(value), pgm_properties(value));
        }
    }
}
