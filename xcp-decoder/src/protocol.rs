//! ASAM MC-1 XCP protocol constants
//!
//! Command codes, packet identifiers, error and event codes, and the bit
//! masks used by the field formatters.

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// PID of a positive response
pub const PID_RESPONSE: u8 = 0xFF;
/// PID of an error response
pub const PID_ERROR: u8 = 0xFE;
/// PID of an event packet
pub const PID_EVENT: u8 = 0xFD;
/// PID of a service request packet
pub const PID_SERVICE: u8 = 0xFC;

/// Standard (level 0) command codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum Command {
    Connect = 0xFF,
    Disconnect = 0xFE,
    GetStatus = 0xFD,
    Synch = 0xFC,
    GetCommModeInfo = 0xFB,
    GetId = 0xFA,
    SetRequest = 0xF9,
    GetSeed = 0xF8,
    Unlock = 0xF7,
    SetMta = 0xF6,
    Upload = 0xF5,
    ShortUpload = 0xF4,
    BuildChecksum = 0xF3,
    TransportLayerCmd = 0xF2,
    UserCmd = 0xF1,
    Download = 0xF0,
    DownloadNext = 0xEF,
    DownloadMax = 0xEE,
    ShortDownload = 0xED,
    ModifyBits = 0xEC,
    SetCalPage = 0xEB,
    GetCalPage = 0xEA,
    GetPagProcessorInfo = 0xE9,
    GetSegmentInfo = 0xE8,
    GetPageInfo = 0xE7,
    SetSegmentMode = 0xE6,
    GetSegmentMode = 0xE5,
    CopyCalPage = 0xE4,
    ClearDaqList = 0xE3,
    SetDaqPtr = 0xE2,
    WriteDaq = 0xE1,
    SetDaqListMode = 0xE0,
    GetDaqListMode = 0xDF,
    StartStopDaqList = 0xDE,
    StartStopSynch = 0xDD,
    GetDaqClock = 0xDC,
    ReadDaq = 0xDB,
    GetDaqProcessorInfo = 0xDA,
    GetDaqResolutionInfo = 0xD9,
    GetDaqListInfo = 0xD8,
    GetDaqEventInfo = 0xD7,
    FreeDaq = 0xD6,
    AllocDaq = 0xD5,
    AllocOdt = 0xD4,
    AllocOdtEntry = 0xD3,
    ProgramStart = 0xD2,
    ProgramClear = 0xD1,
    Program = 0xD0,
    ProgramReset = 0xCF,
    GetPgmProcessorInfo = 0xCE,
    GetSectorInfo = 0xCD,
    ProgramPrepare = 0xCC,
    ProgramFormat = 0xCB,
    ProgramNext = 0xCA,
    ProgramMax = 0xC9,
    ProgramVerify = 0xC8,
    WriteDaqMultiple = 0xC7,
    TimeCorrelationProperties = 0xC6,
    DtoCtrProperties = 0xC5,
    /// Prefix of the level 1 commands, sub-command in byte 1
    Level1 = 0xC0,
}

/// Level 1 sub-commands (second byte after the 0xC0 prefix)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum Level1Command {
    GetVersion = 0x00,
    SetDaqPackedMode = 0x01,
    GetDaqPackedMode = 0x02,
}

/// Error codes carried in byte 1 of an error response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum ErrorCode {
    CmdSynch = 0x00,
    CmdBusy = 0x10,
    DaqActive = 0x11,
    PgmActive = 0x12,
    CmdUnknown = 0x20,
    CmdSyntax = 0x21,
    OutOfRange = 0x22,
    WriteProtected = 0x23,
    AccessDenied = 0x24,
    AccessLocked = 0x25,
    PageNotValid = 0x26,
    ModeNotValid = 0x27,
    SegmentNotValid = 0x28,
    Sequence = 0x29,
    DaqConfig = 0x2A,
    MemoryOverflow = 0x30,
    Generic = 0x31,
    Verify = 0x32,
    ResourceTemporaryNotAccessible = 0x33,
    SubcmdUnknown = 0x34,
    TimecorrStateChange = 0x35,
    Success = 0xFF,
}

impl ErrorCode {
    /// Name as printed inside `ERROR(...)`
    pub fn name(self) -> &'static str {
        match self {
            ErrorCode::CmdSynch => "CMD_SYNCH",
            ErrorCode::CmdBusy => "CMD_BUSY",
            ErrorCode::DaqActive => "DAQ_ACTIVE",
            ErrorCode::PgmActive => "PGM_ACTIVE",
            ErrorCode::CmdUnknown => "CMD_UNKNOWN",
            ErrorCode::CmdSyntax => "CMD_SYNTAX",
            ErrorCode::OutOfRange => "OUT_OF_RANGE",
            ErrorCode::WriteProtected => "WRITE_PROTECTED",
            ErrorCode::AccessDenied => "ACCESS_DENIED",
            ErrorCode::AccessLocked => "ACCESS_LOCKED",
            ErrorCode::PageNotValid => "PAGE_NOT_VALID",
            ErrorCode::ModeNotValid => "MODE_NOT_VALID",
            ErrorCode::SegmentNotValid => "SEGMENT_NOT_VALID",
            ErrorCode::Sequence => "SEQUENCE",
            ErrorCode::DaqConfig => "DAQ_CONFIG",
            ErrorCode::MemoryOverflow => "MEMORY_OVERFLOW",
            ErrorCode::Generic => "GENERIC",
            ErrorCode::Verify => "VERIFY",
            ErrorCode::ResourceTemporaryNotAccessible => "RESOURCE_TEMPORARY_NOT_ACCESSIBLE",
            ErrorCode::SubcmdUnknown => "SUBCMD_UNKNOWN",
            ErrorCode::TimecorrStateChange => "TIMECORR_STATE_CHANGE",
            ErrorCode::Success => "SUCCESS",
        }
    }
}

/// Standard event codes carried in byte 1 of an event packet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum EventCode {
    ResumeMode = 0x00,
    ClearDaq = 0x01,
    StoreDaq = 0x02,
    StoreCal = 0x03,
    CmdPending = 0x05,
    DaqOverload = 0x06,
    SessionTerminated = 0x07,
    TimeSync = 0x08,
    StimTimeout = 0x09,
    Sleep = 0x0A,
    WakeUp = 0x0B,
    User = 0xFE,
    Transport = 0xFF,
}

impl EventCode {
    /// Name as printed after `EVENT(id = `
    pub fn name(self) -> &'static str {
        match self {
            EventCode::ResumeMode => "EV_RESUME_MODE",
            EventCode::ClearDaq => "EV_CLEAR_DAQ",
            EventCode::StoreDaq => "EV_STORE_DAQ",
            EventCode::StoreCal => "EV_STORE_CAL",
            EventCode::CmdPending => "EV_CMD_PENDING",
            EventCode::DaqOverload => "EV_DAQ_OVERLOAD",
            EventCode::SessionTerminated => "EV_SESSION_TERMINATED",
            EventCode::TimeSync => "EV_TIME_SYNC",
            EventCode::StimTimeout => "EV_STIM_TIMEOUT",
            EventCode::Sleep => "EV_SLEEP",
            EventCode::WakeUp => "EV_WAKE_UP",
            EventCode::User => "EV_USER",
            EventCode::Transport => "EV_TRANSPORT",
        }
    }
}

// Resources
pub const RESOURCE_PGM: u8 = 0x10;
pub const RESOURCE_STIM: u8 = 0x08;
pub const RESOURCE_DAQ: u8 = 0x04;
pub const RESOURCE_CAL_PAG: u8 = 0x01;

// Comm mode basic
pub const COMM_MODE_OPTIONAL: u8 = 0x80;
pub const COMM_MODE_SLAVE_BLOCK_MODE: u8 = 0x40;
pub const COMM_MODE_ADDRESS_GRANULARITY: u8 = 0x06;
pub const COMM_MODE_BYTE_ORDER_MOTOROLA: u8 = 0x01;

// Comm mode optional
pub const COMM_MODE_MASTER_BLOCK_MODE: u8 = 0x01;
pub const COMM_MODE_INTERLEAVED_MODE: u8 = 0x02;

// Current session status
pub const SESSION_RESUME: u8 = 0x80;
pub const SESSION_DAQ_RUNNING: u8 = 0x40;
pub const SESSION_CLEAR_DAQ_REQ: u8 = 0x08;
pub const SESSION_STORE_DAQ_REQ: u8 = 0x04;
pub const SESSION_STORE_CAL_REQ: u8 = 0x01;

// GET_ID mode
pub const GET_ID_COMPRESSED_ENCRYPTED: u8 = 0x02;
pub const GET_ID_TRANSFER_MODE: u8 = 0x01;

// SET_REQUEST mode
pub const SET_REQUEST_CLEAR_DAQ_REQ: u8 = 0x08;
pub const SET_REQUEST_STORE_DAQ_REQ_RESUME: u8 = 0x04;
pub const SET_REQUEST_STORE_DAQ_REQ_NO_RESUME: u8 = 0x02;
pub const SET_REQUEST_STORE_CAL_REQ: u8 = 0x01;

// SET_CAL_PAGE / GET_CAL_PAGE mode
pub const CAL_PAGE_ALL: u8 = 0x80;
pub const CAL_PAGE_XCP: u8 = 0x02;
pub const CAL_PAGE_ECU: u8 = 0x01;

// PAG processor properties
pub const PAG_FREEZE_SUPPORTED: u8 = 0x01;

// Segment mode
pub const SEGMENT_MODE_FREEZE: u8 = 0x01;

// SET_DAQ_LIST_MODE mode
pub const DAQ_LIST_MODE_ALTERNATING: u8 = 0x01;
pub const DAQ_LIST_MODE_DIRECTION: u8 = 0x02;
pub const DAQ_LIST_MODE_TIMESTAMP: u8 = 0x10;
pub const DAQ_LIST_MODE_PID_OFF: u8 = 0x20;

// GET_DAQ_LIST_MODE current mode
pub const DAQ_CURRENT_RESUME: u8 = 0x80;
pub const DAQ_CURRENT_RUNNING: u8 = 0x40;
pub const DAQ_CURRENT_PID_OFF: u8 = 0x20;
pub const DAQ_CURRENT_TIMESTAMP: u8 = 0x10;
pub const DAQ_CURRENT_DIRECTION: u8 = 0x02;
pub const DAQ_CURRENT_SELECTED: u8 = 0x01;

// DAQ properties
pub const DAQ_PROP_OVERLOAD_INDICATION: u8 = 0xC0;
pub const DAQ_PROP_PID_OFF_SUPPORTED: u8 = 0x20;
pub const DAQ_PROP_TIMESTAMP_SUPPORTED: u8 = 0x10;
pub const DAQ_PROP_BIT_STIM_SUPPORTED: u8 = 0x08;
pub const DAQ_PROP_RESUME_SUPPORTED: u8 = 0x04;
pub const DAQ_PROP_PRESCALER_SUPPORTED: u8 = 0x02;
pub const DAQ_PROP_CONFIG_TYPE_DYNAMIC: u8 = 0x01;

// DAQ key byte
pub const DAQ_KEY_IDENTIFICATION_FIELD: u8 = 0xC0;
pub const DAQ_KEY_ADDRESS_EXTENSION: u8 = 0x30;
pub const DAQ_KEY_OPTIMISATION: u8 = 0x0F;

// DAQ timestamp mode
pub const TIMESTAMP_MODE_UNIT: u8 = 0xF0;
pub const TIMESTAMP_MODE_FIXED: u8 = 0x08;
pub const TIMESTAMP_MODE_SIZE: u8 = 0x07;

// DAQ event channel properties
pub const EVENT_CHANNEL_TYPE: u8 = 0x0C;
pub const EVENT_CONSISTENCY: u8 = 0xC0;

// DAQ list properties
pub const DAQ_LIST_TYPE: u8 = 0x0C;
pub const DAQ_LIST_EVENT_FIXED: u8 = 0x02;
pub const DAQ_LIST_PREDEFINED: u8 = 0x01;

// PGM comm mode
pub const PGM_SLAVE_BLOCK_MODE: u8 = 0x40;
pub const PGM_INTERLEAVED_MODE: u8 = 0x02;
pub const PGM_MASTER_BLOCK_MODE: u8 = 0x01;

// PGM properties
pub const PGM_NON_SEQ_PGM: u8 = 0xC0;
pub const PGM_ENCRYPTION: u8 = 0x30;
pub const PGM_COMPRESSION: u8 = 0x0C;
pub const PGM_CLEAR_MODE: u8 = 0x03;
