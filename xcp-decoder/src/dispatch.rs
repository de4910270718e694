//! Command table
//!
//! Every supported command is one [`CommandEntry`]: its name, the request
//! decoder, which request fields the session must remember, and the layout
//! of its positive response. Adding a command means adding a row here.

use crate::fields::Fields;
use crate::payload::Payload;
use crate::protocol::{Command, Command as C, Level1Command};
use crate::{request, response};
use std::fmt;

/// Decodes the fixed fields of a request, returns the bytes the layout covers
pub type RequestFn = fn(&Payload<'_>, &mut Fields) -> usize;

/// Decodes a positive response; `None` selects the generic rendering
pub type ResponseFn = fn(&Payload<'_>, &RequestContext, &mut Fields) -> Option<usize>;

/// Table key: a standard command code or a level 1 sub-command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKey {
    Standard(Command),
    Level1(Level1Command),
}

/// Request fields a positive response needs to be decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persist {
    Nothing,
    SegmentInfo,
    SectorInfo,
}

/// Request fields captured when the session is armed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestContext {
    #[default]
    None,
    /// GET_SEGMENT_INFO mode, segment info selector and mapping index
    SegmentInfo {
        mode: u8,
        segment_info: u8,
        mapping_index: Option<u8>,
    },
    /// GET_SECTOR_INFO mode
    SectorInfo { mode: u8 },
}

pub struct CommandEntry {
    pub key: CommandKey,
    pub name: &'static str,
    pub request: RequestFn,
    pub persist: Persist,
    pub response: Option<ResponseFn>,
}

impl fmt::Debug for CommandEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandEntry")
            .field("key", &self.key)
            .field("name", &self.name)
            .field("persist", &self.persist)
            .field("has_response", &self.response.is_some())
            .finish()
    }
}

impl CommandEntry {
    /// Capture the fields named by `persist` from a request payload
    ///
    /// A request too short to carry them yields [`RequestContext::None`],
    /// which makes the response fall back to the generic rendering.
    pub fn capture(&self, payload: &Payload<'_>) -> RequestContext {
        let captured = match self.persist {
            Persist::Nothing => None,
            Persist::SegmentInfo => payload.byte(1).zip(payload.byte(3)).map(|(mode, info)| {
                RequestContext::SegmentInfo {
                    mode,
                    segment_info: info,
                    mapping_index: payload.byte(4),
                }
            }),
            Persist::SectorInfo => payload
                .byte(1)
                .map(|mode| RequestContext::SectorInfo { mode }),
        };
        captured.unwrap_or_default()
    }
}

const fn entry(
    key: CommandKey,
    name: &'static str,
    request: RequestFn,
    persist: Persist,
    response: Option<ResponseFn>,
) -> CommandEntry {
    CommandEntry {
        key,
        name,
        request,
        persist,
        response,
    }
}

const fn standard(
    command: Command,
    name: &'static str,
    request: RequestFn,
    response: Option<ResponseFn>,
) -> CommandEntry {
    entry(CommandKey::Standard(command), name, request, Persist::Nothing, response)
}

const fn level1(
    command: Level1Command,
    name: &'static str,
    request: RequestFn,
    response: Option<ResponseFn>,
) -> CommandEntry {
    entry(CommandKey::Level1(command), name, request, Persist::Nothing, response)
}

pub static COMMANDS: &[CommandEntry] = &[
    // Standard commands
    standard(C::Connect, "CONNECT", request::connect, Some(response::connect)),
    standard(C::Disconnect, "DISCONNECT", request::no_params, None),
    standard(C::GetStatus, "GET_STATUS", request::no_params, Some(response::get_status)),
    standard(C::Synch, "SYNCH", request::no_params, None),
    standard(
        C::GetCommModeInfo,
        "GET_COMM_MODE_INFO",
        request::no_params,
        Some(response::get_comm_mode_info),
    ),
    standard(C::GetId, "GET_ID", request::get_id, Some(response::get_id)),
    standard(C::SetRequest, "SET_REQUEST", request::set_request, None),
    standard(C::GetSeed, "GET_SEED", request::get_seed, Some(response::get_seed)),
    standard(C::Unlock, "UNLOCK", request::unlock, Some(response::unlock)),
    standard(C::SetMta, "SET_MTA", request::set_mta, None),
    standard(C::Upload, "UPLOAD", request::upload, Some(response::upload)),
    standard(C::ShortUpload, "SHORT_UPLOAD", request::short_upload, Some(response::upload)),
    standard(
        C::BuildChecksum,
        "BUILD_CHECKSUM",
        request::build_checksum,
        Some(response::build_checksum),
    ),
    standard(C::TransportLayerCmd, "TRANSPORT_LAYER_CMD", request::sub_command, None),
    standard(C::UserCmd, "USER_CMD", request::sub_command, None),
    // Calibration
    standard(C::Download, "DOWNLOAD", request::data_elements, None),
    standard(C::DownloadNext, "DOWNLOAD_NEXT", request::data_elements, None),
    standard(C::DownloadMax, "DOWNLOAD_MAX", request::max_elements, None),
    standard(C::ShortDownload, "SHORT_DOWNLOAD", request::short_download, None),
    standard(C::ModifyBits, "MODIFY_BITS", request::modify_bits, None),
    // Page switching
    standard(C::SetCalPage, "SET_CAL_PAGE", request::set_cal_page, None),
    standard(C::GetCalPage, "GET_CAL_PAGE", request::get_cal_page, Some(response::get_cal_page)),
    standard(
        C::GetPagProcessorInfo,
        "GET_PAG_PROCESSOR_INFO",
        request::no_params,
        Some(response::get_pag_processor_info),
    ),
    entry(
        CommandKey::Standard(C::GetSegmentInfo),
        "GET_SEGMENT_INFO",
        request::get_segment_info,
        Persist::SegmentInfo,
        Some(response::get_segment_info),
    ),
    standard(C::GetPageInfo, "GET_PAGE_INFO", request::get_page_info, Some(response::get_page_info)),
    standard(C::SetSegmentMode, "SET_SEGMENT_MODE", request::set_segment_mode, None),
    standard(
        C::GetSegmentMode,
        "GET_SEGMENT_MODE",
        request::get_segment_mode,
        Some(response::get_segment_mode),
    ),
    standard(C::CopyCalPage, "COPY_CAL_PAGE", request::copy_cal_page, None),
    // Data acquisition and stimulation
    standard(C::ClearDaqList, "CLEAR_DAQ_LIST", request::daq_list_number, None),
    standard(C::SetDaqPtr, "SET_DAQ_PTR", request::set_daq_ptr, None),
    standard(C::WriteDaq, "WRITE_DAQ", request::write_daq, None),
    standard(C::SetDaqListMode, "SET_DAQ_LIST_MODE", request::set_daq_list_mode, None),
    standard(
        C::GetDaqListMode,
        "GET_DAQ_LIST_MODE",
        request::daq_list_number,
        Some(response::get_daq_list_mode),
    ),
    standard(
        C::StartStopDaqList,
        "START_STOP_DAQ_LIST",
        request::start_stop_daq_list,
        Some(response::start_stop_daq_list),
    ),
    standard(C::StartStopSynch, "START_STOP_SYNCH", request::start_stop_synch, None),
    standard(C::GetDaqClock, "GET_DAQ_CLOCK", request::no_params, Some(response::get_daq_clock)),
    standard(C::ReadDaq, "READ_DAQ", request::no_params, Some(response::read_daq)),
    standard(
        C::GetDaqProcessorInfo,
        "GET_DAQ_PROCESSOR_INFO",
        request::no_params,
        Some(response::get_daq_processor_info),
    ),
    standard(
        C::GetDaqResolutionInfo,
        "GET_DAQ_RESOLUTION_INFO",
        request::no_params,
        Some(response::get_daq_resolution_info),
    ),
    standard(
        C::GetDaqListInfo,
        "GET_DAQ_LIST_INFO",
        request::daq_list_number,
        Some(response::get_daq_list_info),
    ),
    standard(
        C::GetDaqEventInfo,
        "GET_DAQ_EVENT_INFO",
        request::get_daq_event_info,
        Some(response::get_daq_event_info),
    ),
    standard(C::FreeDaq, "FREE_DAQ", request::no_params, None),
    standard(C::AllocDaq, "ALLOC_DAQ", request::alloc_daq, None),
    standard(C::AllocOdt, "ALLOC_ODT", request::alloc_odt, None),
    standard(C::AllocOdtEntry, "ALLOC_ODT_ENTRY", request::alloc_odt_entry, None),
    // Flash programming
    standard(C::ProgramStart, "PROGRAM_START", request::no_params, Some(response::program_start)),
    standard(C::ProgramClear, "PROGRAM_CLEAR", request::program_clear, None),
    standard(C::Program, "PROGRAM", request::data_elements, None),
    standard(C::ProgramReset, "PROGRAM_RESET", request::no_params, None),
    standard(
        C::GetPgmProcessorInfo,
        "GET_PGM_PROCESSOR_INFO",
        request::no_params,
        Some(response::get_pgm_processor_info),
    ),
    entry(
        CommandKey::Standard(C::GetSectorInfo),
        "GET_SECTOR_INFO",
        request::get_sector_info,
        Persist::SectorInfo,
        Some(response::get_sector_info),
    ),
    standard(C::ProgramPrepare, "PROGRAM_PREPARE", request::program_prepare, None),
    standard(C::ProgramFormat, "PROGRAM_FORMAT", request::program_format, None),
    standard(C::ProgramNext, "PROGRAM_NEXT", request::data_elements, None),
    standard(C::ProgramMax, "PROGRAM_MAX", request::max_elements, None),
    standard(C::ProgramVerify, "PROGRAM_VERIFY", request::program_verify, None),
    standard(C::WriteDaqMultiple, "WRITE_DAQ_MULTIPLE", request::write_daq_multiple, None),
    standard(
        C::TimeCorrelationProperties,
        "TIME_CORRELATION_PROPERTIES",
        request::time_correlation_properties,
        None,
    ),
    standard(C::DtoCtrProperties, "DTO_CTR_PROPERTIES", request::dto_ctr_properties, None),
    // Level 1 commands
    level1(
        Level1Command::GetVersion,
        "GET_VERSION",
        request::level1_no_params,
        Some(response::get_version),
    ),
    level1(
        Level1Command::SetDaqPackedMode,
        "SET_DAQ_PACKED_MODE",
        request::set_daq_packed_mode,
        None,
    ),
    level1(
        Level1Command::GetDaqPackedMode,
        "GET_DAQ_PACKED_MODE",
        request::daq_list_number,
        Some(response::get_daq_packed_mode),
    ),
];

/// Look up a command by key
pub fn find(key: CommandKey) -> Option<&'static CommandEntry> {
    COMMANDS.iter().find(|entry| entry.key == key)
}

/// Look up a standard command
pub fn find_standard(command: Command) -> Option<&'static CommandEntry> {
    find(CommandKey::Standard(command))
}

/// Key of the command a request payload carries
///
/// Level 1 commands need the sub-command in byte 1.
pub fn key_of(payload: &Payload<'_>) -> Option<CommandKey> {
    match Command::try_from(payload.byte(0)?).ok()? {
        Command::Level1 => {
            let sub = Level1Command::try_from(payload.byte(1)?).ok()?;
            Some(CommandKey::Level1(sub))
        }
        command => Some(CommandKey::Standard(command)),
    }
}

/// Table entry for a request payload, `None` for unknown commands
pub fn lookup(payload: &Payload<'_>) -> Option<&'static CommandEntry> {
    key_of(payload).and_then(find)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_table_keys_and_names_are_unique() {
        let keys: HashSet<_> = COMMANDS.iter().map(|e| e.key).collect();
        let names: HashSet<_> = COMMANDS.iter().map(|e| e.name).collect();
        assert_eq!(keys.len(), COMMANDS.len());
        assert_eq!(names.len(), COMMANDS.len());
    }

    #[test]
    fn test_every_standard_command_has_an_entry() {
        for code in 0xC1..=0xFFu8 {
            if let Ok(command) = Command::try_from(code) {
                assert!(find_standard(command).is_some(), "missing 0x{:02X}", code);
            }
        }
    }

    #[test]
    fn test_lookup_level1() {
        let entry = lookup(&Payload::new(&[0xC0, 0x00]));
        assert_eq!(entry.map(|e| e.name), Some("GET_VERSION"));
        assert!(lookup(&Payload::new(&[0xC0, 0x07])).is_none());
        assert!(lookup(&Payload::new(&[0xC0])).is_none());
        assert!(lookup(&Payload::new(&[0x42])).is_none());
        assert!(lookup(&Payload::new(&[])).is_none());
    }

    #[test]
    fn test_capture_segment_info() {
        let payload = Payload::new(&[0xE8, 0x02, 0x00, 0x01, 0x04]);
        let context = find_standard(Command::GetSegmentInfo).map(|e| e.capture(&payload));
        assert_eq!(
            context,
            Some(RequestContext::SegmentInfo {
                mode: 2,
                segment_info: 1,
                mapping_index: Some(4),
            })
        );
    }

    #[test]
    fn test_capture_from_short_request_is_none() {
        let short = Payload::new(&[0xCD]);
        let context = find_standard(Command::GetSectorInfo).map(|e| e.capture(&short));
        assert_eq!(context, Some(RequestContext::None));

        let connect = Payload::new(&[0xFF, 0x00]);
        let context = find_standard(Command::Connect).map(|e| e.capture(&connect));
        assert_eq!(context, Some(RequestContext::None));
    }
}
