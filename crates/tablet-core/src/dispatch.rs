//! Capability-based report dispatch.
//!
//! For every capability present on both the report and the sink, the matching
//! handler is invoked.  The call order is fixed so that a given report always
//! produces the same call sequence:
//!
//! ```text
//! eraser → position → pressure → tilt → proximity → hover distance → [reset] → flush
//! ```
//!
//! `reset` is only issued for out-of-range reports; `flush` once per report,
//! both only for sinks that implement [`SynchronousPointer`](crate::pointer::SynchronousPointer).

use tracing::trace;

use crate::device::PenSpecifications;
use crate::pointer::PointerSink;
use crate::report::DeviceReport;

/// Routes the capabilities of `report` to `pointer`.
///
/// `pen` supplies the maximum pressure used to normalize raw pressure values.
pub fn dispatch<P>(report: &DeviceReport, pointer: &mut P, pen: Option<&PenSpecifications>)
where
    P: PointerSink + ?Sized,
{
    trace!(?report, "dispatching report");

    if let Some(eraser) = report.eraser {
        if let Some(handler) = pointer.eraser() {
            handler.set_eraser(eraser);
        }
    }
    if let Some(position) = report.position {
        if let Some(handler) = pointer.position() {
            handler.set_position(position);
        }
    }
    if let Some(pressure) = report.pressure {
        if let Some(handler) = pointer.pressure() {
            handler.set_pressure(normalize_pressure(pressure, pen));
        }
    }
    if let Some(tilt) = report.tilt {
        if let Some(handler) = pointer.tilt() {
            handler.set_tilt(tilt);
        }
    }
    if let Some(proximity) = report.proximity {
        if let Some(handler) = pointer.proximity() {
            handler.set_proximity(proximity.near);
        }
        if let Some(handler) = pointer.hover_distance() {
            handler.set_hover_distance(proximity.hover_distance);
        }
    }
    if let Some(sync) = pointer.synchronous() {
        if report.out_of_range {
            sync.reset();
        }
        sync.flush();
    }
}

/// Scales a raw pressure value into `0.0..=1.0`.
///
/// Without a known maximum the value degrades to contact / no contact.
pub fn normalize_pressure(raw: u32, pen: Option<&PenSpecifications>) -> f32 {
    match pen {
        Some(pen) if pen.max_pressure > 0 => raw as f32 / pen.max_pressure as f32,
        _ if raw > 0 => 1.0,
        _ => 0.0,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
