//! Response decoding
//!
//! The first byte of a slave frame selects the packet kind. Positive
//! responses carry no command code of their own, so their layout comes from
//! the request the session remembers. Everything else is decoded from the
//! frame alone.

use crate::dispatch::RequestContext;
use crate::event;
use crate::fields::{Fields, TRUNCATED};
use crate::formatters;
use crate::payload::{hex_dump, Payload};
use crate::protocol::{ErrorCode, PID_ERROR, PID_EVENT, PID_RESPONSE, PID_SERVICE};
use crate::session::PendingRequest;
use crate::types::{CanFrame, DecodedMessage, Direction};
use log::{trace, warn};

/// Decode a frame sent by the slave of a session
pub fn decode(frame: &CanFrame, pending: &PendingRequest) -> DecodedMessage {
    let payload = Payload::new(&frame.data);
    let Some(pid) = payload.byte(0) else {
        warn!("Empty response frame on 0x{:X}", frame.can_id);
        return DecodedMessage::from_frame(
            frame,
            Direction::PositiveResponse,
            format!("<- {}", TRUNCATED),
        );
    };

    match pid {
        PID_RESPONSE => positive(frame, &payload, pending),
        PID_ERROR => error(frame, &payload, pending),
        PID_EVENT => event::decode(frame, &payload),
        PID_SERVICE => {
            let text = format!("<- SERVICE REQ({})", hex_dump(payload.bytes(), 1));
            DecodedMessage::from_frame(frame, Direction::ServiceRequest, text).with_consumed(1)
        }
        pid => {
            // In the CAN mapping the PID of a DTO is the absolute ODT number
            let mut fields = Fields::new();
            fields.field("pid", Some(pid));
            fields.trailer(None, payload.bytes(), 1);
            let text = format!("<- {}", fields.call("DTO"));
            DecodedMessage::from_frame(frame, Direction::Dto, text).with_consumed(1)
        }
    }
}

fn positive(frame: &CanFrame, payload: &Payload<'_>, pending: &PendingRequest) -> DecodedMessage {
    let mut fields = Fields::new();
    let decoded = match pending {
        PendingRequest::Armed {
            entry: Some(entry),
            context,
            ..
        } => entry
            .response
            .and_then(|decode| decode(payload, context, &mut fields)),
        _ => None,
    };

    let consumed = match decoded {
        Some(consumed) => {
            if consumed > payload.len() {
                warn!(
                    "Truncated {} response on 0x{:X}: {} of {} bytes",
                    pending.command_name().unwrap_or("?"),
                    frame.can_id,
                    payload.len(),
                    consumed
                );
            }
            consumed
        }
        None => {
            trace!("No response layout for {:?}, using generic rendering", pending.command_name());
            fields = Fields::new();
            1
        }
    };
    fields.trailer(None, payload.bytes(), consumed);

    let text = if fields.is_empty() {
        "<- OK".to_string()
    } else {
        format!("<- {}", fields.call("OK"))
    };
    DecodedMessage::from_frame(frame, Direction::PositiveResponse, text)
        .with_command(pending.command_name())
        .with_consumed(consumed)
}

fn error(frame: &CanFrame, payload: &Payload<'_>, pending: &PendingRequest) -> DecodedMessage {
    let mut fields = Fields::new();
    let consumed = match payload.byte(1).map(ErrorCode::try_from) {
        Some(Ok(code)) => {
            fields.push(code.name());
            fields.trailer(None, payload.bytes(), 2);
            2
        }
        Some(Err(_)) => {
            fields.trailer(None, payload.bytes(), 1);
            1
        }
        None => {
            fields.truncated("code");
            2
        }
    };

    DecodedMessage::from_frame(
        frame,
        Direction::ErrorResponse,
        format!("<- {}", fields.call("ERROR")),
    )
    .with_command(pending.command_name())
    .with_consumed(consumed)
}

/// Append `label: [ .. ]` for the bytes from `offset` on
fn data_block(p: &Payload<'_>, f: &mut Fields, label: &str, offset: usize) -> usize {
    f.trailer(Some(label), p.bytes(), offset);
    p.len().max(offset)
}

/// `major.minor` from two consecutive bytes
fn version(p: &Payload<'_>, offset: usize) -> Option<String> {
    p.byte(offset)
        .zip(p.byte(offset + 1))
        .map(|(major, minor)| format!("{}.{}", major, minor))
}

pub fn connect(p: &Payload<'_>, _ctx: &RequestContext, f: &mut Fields) -> Option<usize> {
    f.with("resources", p.byte(1), formatters::resources);
    f.with("commModeBasic", p.byte(2), formatters::comm_mode_basic);
    f.field("maxCto", p.byte(3));
    f.field("maxDto", p.word(4));
    f.field("protocolLayerVersion", version(p, 6));
    Some(8)
}

pub fn get_status(p: &Payload<'_>, _ctx: &RequestContext, f: &mut Fields) -> Option<usize> {
    f.with("sessionStatus", p.byte(1), formatters::session_status);
    f.with("protected", p.byte(2), formatters::resources);
    f.field("sessionConfigurationId", p.word(4));
    Some(6)
}

pub fn get_comm_mode_info(p: &Payload<'_>, _ctx: &RequestContext, f: &mut Fields) -> Option<usize> {
    f.with("commModeOptional", p.byte(2), formatters::comm_mode_optional);
    f.field("maxBs", p.byte(4));
    f.field("minSt", p.byte(5));
    f.field("queueSize", p.byte(6));
    f.with("XCPDriverVersion", p.byte(7), |v| format!("{}.{}", v >> 4, v & 0x0F));
    Some(8)
}

pub fn get_id(p: &Payload<'_>, _ctx: &RequestContext, f: &mut Fields) -> Option<usize> {
    f.with("mode", p.byte(1), formatters::get_id_mode);
    f.field("length", p.dword(4));
    Some(data_block(p, f, "identification", 8))
}

pub fn get_seed(p: &Payload<'_>, _ctx: &RequestContext, f: &mut Fields) -> Option<usize> {
    f.field("length", p.byte(1));
    Some(data_block(p, f, "seed", 2))
}

pub fn unlock(p: &Payload<'_>, _ctx: &RequestContext, f: &mut Fields) -> Option<usize> {
    f.with("protected", p.byte(1), formatters::resources);
    Some(2)
}

/// UPLOAD and SHORT_UPLOAD
pub fn upload(p: &Payload<'_>, _ctx: &RequestContext, f: &mut Fields) -> Option<usize> {
    Some(data_block(p, f, "elements", 1))
}

pub fn build_checksum(p: &Payload<'_>, _ctx: &RequestContext, f: &mut Fields) -> Option<usize> {
    f.with("checksumMethod", p.byte(1), formatters::checksum_method);
    f.hex32("checksum", p.dword(4));
    Some(8)
}

pub fn get_cal_page(p: &Payload<'_>, _ctx: &RequestContext, f: &mut Fields) -> Option<usize> {
    f.field("logicalDataPageNumber", p.byte(3));
    Some(4)
}

pub fn get_pag_processor_info(
    p: &Payload<'_>,
    _ctx: &RequestContext,
    f: &mut Fields,
) -> Option<usize> {
    f.field("maxSegment", p.byte(1));
    f.with("properties", p.byte(2), formatters::pag_properties);
    Some(3)
}

/// Layout depends on the mode and segment info of the request
pub fn get_segment_info(p: &Payload<'_>, ctx: &RequestContext, f: &mut Fields) -> Option<usize> {
    let RequestContext::SegmentInfo {
        mode, segment_info, ..
    } = *ctx
    else {
        return None;
    };

    match (mode, segment_info) {
        (0, 0) => f.hex32("address", p.dword(4)),
        (0, 1) => f.field("length", p.dword(4)),
        (1, _) => {
            f.field("maxPages", p.byte(1));
            f.field("addressExtension", p.byte(2));
            f.field("maxMapping", p.byte(3));
            f.field("compressionMethod", p.byte(4));
            f.field("encryptionMethod", p.byte(5));
            return Some(6);
        }
        (2, 0) => f.hex32("sourceAddress", p.dword(4)),
        (2, 1) => f.hex32("destinationAddress", p.dword(4)),
        (2, 2) => f.field("length", p.dword(4)),
        _ => return None,
    }
    Some(8)
}

pub fn get_page_info(p: &Payload<'_>, _ctx: &RequestContext, f: &mut Fields) -> Option<usize> {
    f.with("properties", p.byte(1), formatters::page_properties);
    f.field("initSegment", p.byte(2));
    Some(3)
}

pub fn get_segment_mode(p: &Payload<'_>, _ctx: &RequestContext, f: &mut Fields) -> Option<usize> {
    f.with("segmentMode", p.byte(2), formatters::segment_mode);
    Some(3)
}

pub fn start_stop_daq_list(
    p: &Payload<'_>,
    _ctx: &RequestContext,
    f: &mut Fields,
) -> Option<usize> {
    f.field("firstPID", p.byte(1));
    Some(2)
}

pub fn get_daq_clock(p: &Payload<'_>, _ctx: &RequestContext, f: &mut Fields) -> Option<usize> {
    f.field("timestamp", p.dword(4));
    Some(8)
}

pub fn read_daq(p: &Payload<'_>, _ctx: &RequestContext, f: &mut Fields) -> Option<usize> {
    f.field("bitOffset", p.byte(1));
    f.field("elementSize", p.byte(2));
    f.hex8("addressExtension", p.byte(3));
    f.hex32("address", p.dword(4));
    Some(8)
}

pub fn get_daq_processor_info(
    p: &Payload<'_>,
    _ctx: &RequestContext,
    f: &mut Fields,
) -> Option<usize> {
    f.with("daqProperties", p.byte(1), formatters::daq_properties);
    f.field("minDaq", p.byte(6));
    f.field("maxDaq", p.word(2));
    f.field("maxEventChannel", p.word(4));
    f.with("keyByte", p.byte(7), formatters::daq_key_byte);
    Some(8)
}

pub fn get_daq_resolution_info(
    p: &Payload<'_>,
    _ctx: &RequestContext,
    f: &mut Fields,
) -> Option<usize> {
    f.field("granularityOdtEntrySizeDaq", p.byte(1));
    f.field("maxOdtEntrySizeDaq", p.byte(2));
    f.field("granularityOdtEntrySizeStim", p.byte(3));
    f.field("maxOdtEntrySizeStim", p.byte(4));
    f.with("timestampMode", p.byte(5), formatters::daq_timestamp_mode);
    f.field("timestampTicks", p.word(6));
    Some(8)
}

pub fn get_daq_list_mode(p: &Payload<'_>, _ctx: &RequestContext, f: &mut Fields) -> Option<usize> {
    f.with("mode", p.byte(1), formatters::daq_current_list_mode);
    f.field("currentEventChannelNumber", p.word(4));
    f.field("currentPrescaler", p.byte(6));
    f.field("currentDaqListPriority", p.byte(7));
    Some(8)
}

pub fn get_daq_event_info(
    p: &Payload<'_>,
    _ctx: &RequestContext,
    f: &mut Fields,
) -> Option<usize> {
    f.with("eventProperties", p.byte(1), formatters::daq_event_properties);
    f.field("maxDaqList", p.byte(2));
    f.field("channelNameLength", p.byte(3));
    match p.byte(4) {
        Some(0) => {
            f.push("channelTimeCycle = \"not cyclic\"");
            f.push("channelTimeUnit = \"N/A\"");
        }
        cycle => {
            f.field("channelTimeCycle", cycle);
            f.with("unit", p.byte(5), formatters::time_unit);
        }
    }
    f.field("channelPriority", p.byte(6));
    Some(7)
}

pub fn get_daq_list_info(p: &Payload<'_>, _ctx: &RequestContext, f: &mut Fields) -> Option<usize> {
    f.with("properties", p.byte(1), formatters::daq_list_properties);
    f.field("maxOdt", p.byte(2));
    f.field("maxOdtEntries", p.byte(3));
    f.field("fixedEvent", p.word(4));
    Some(6)
}

pub fn program_start(p: &Payload<'_>, _ctx: &RequestContext, f: &mut Fields) -> Option<usize> {
    f.with("mode", p.byte(2), formatters::pgm_comm_mode);
    f.field("maxCtoPgm", p.byte(3));
    f.field("maxBsPgm", p.byte(4));
    f.field("minStPgm", p.byte(5));
    f.field("queueSizePgm", p.byte(6));
    Some(7)
}

pub fn get_pgm_processor_info(
    p: &Payload<'_>,
    _ctx: &RequestContext,
    f: &mut Fields,
) -> Option<usize> {
    f.with("properties", p.byte(1), formatters::pgm_properties);
    f.field("maxSector", p.byte(2));
    Some(3)
}

/// Layout depends on the mode of the request
pub fn get_sector_info(p: &Payload<'_>, ctx: &RequestContext, f: &mut Fields) -> Option<usize> {
    let RequestContext::SectorInfo { mode } = *ctx else {
        return None;
    };

    match mode {
        0 | 1 => {
            f.field("clearSequenceNumber", p.byte(1));
            f.field("programSequenceNumber", p.byte(2));
            f.field("programmingMethod", p.byte(3));
            if mode == 0 {
                f.hex32("startAddress", p.dword(4));
            } else {
                f.field("length", p.dword(4));
            }
            Some(8)
        }
        2 => {
            f.field("nameLength", p.byte(1));
            Some(2)
        }
        _ => None,
    }
}

pub fn get_version(p: &Payload<'_>, _ctx: &RequestContext, f: &mut Fields) -> Option<usize> {
    f.field("protocolLayerVersion", version(p, 2));
    f.field("transportLayerVersion", version(p, 4));
    Some(6)
}

pub fn get_daq_packed_mode(
    p: &Payload<'_>,
    _ctx: &RequestContext,
    f: &mut Fields,
) -> Option<usize> {
    let mode = p.byte(2);
    f.with("daqPackedMode", mode, formatters::daq_packed_mode);
    match mode {
        Some(0) => Some(3),
        _ => {
            f.with("dpmTimestampMode", p.byte(3), formatters::dpm_timestamp_mode);
            f.field("dpmSampleCount", p.word(4));
            Some(6)
        }
    }
}
