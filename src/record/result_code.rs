//! Per-key outcome codes of a batch operation.
//!
//! Codes are carried as plain `i32` so that values this catalogue does not
//! know about still flow through untouched.

/// The operation succeeded.
pub const OK: i32 = 0;
/// Unknown server failure.
pub const SERVER_ERROR: i32 = 1;
/// No record exists under the key.
pub const KEY_NOT_FOUND: i32 = 2;
/// The expected generation did not match.
pub const GENERATION_ERROR: i32 = 3;
/// The request carried an invalid parameter.
pub const PARAMETER_ERROR: i32 = 4;
/// A create found an existing record.
pub const KEY_EXISTS: i32 = 5;
/// A bin create found an existing bin.
pub const BIN_EXISTS: i32 = 6;
/// The cluster changed during the request.
pub const CLUSTER_KEY_MISMATCH: i32 = 7;
/// The server ran out of memory.
pub const SERVER_MEM_ERROR: i32 = 8;
/// The server timed out.
pub const TIMEOUT: i32 = 9;
/// The operation is not allowed in this configuration.
pub const ALWAYS_FORBIDDEN: i32 = 10;
/// The owning partition is unavailable.
pub const PARTITION_UNAVAILABLE: i32 = 11;
/// An operation was applied to a bin of the wrong type.
pub const BIN_TYPE_ERROR: i32 = 12;
/// The record exceeds the storage limit.
pub const RECORD_TOO_BIG: i32 = 13;
/// Too many concurrent operations on the record.
pub const KEY_BUSY: i32 = 14;
/// The scan was aborted.
pub const SCAN_ABORT: i32 = 15;
/// The server does not support the operation.
pub const UNSUPPORTED_FEATURE: i32 = 16;
/// The bin does not exist.
pub const BIN_NOT_FOUND: i32 = 17;
/// The storage device is overloaded.
pub const DEVICE_OVERLOAD: i32 = 18;
/// The key type does not match the stored key.
pub const KEY_MISMATCH: i32 = 19;
/// The namespace does not exist.
pub const INVALID_NAMESPACE: i32 = 20;
/// The bin name exceeds the length limit.
pub const BIN_NAME_TOO_LONG: i32 = 21;
/// The operation is forbidden in the current state.
pub const FAIL_FORBIDDEN: i32 = 22;
/// A collection element was not found.
pub const ELEMENT_NOT_FOUND: i32 = 23;
/// A collection element already exists.
pub const ELEMENT_EXISTS: i32 = 24;
/// The feature needs the enterprise edition.
pub const ENTERPRISE_ONLY: i32 = 25;
/// The operation does not apply to the value.
pub const OP_NOT_APPLICABLE: i32 = 26;
/// The record was skipped by a filter expression.
pub const FILTERED_OUT: i32 = 27;
/// The write lost a conflict resolution.
pub const LOST_CONFLICT: i32 = 28;

/// Human readable name of a known code.
pub fn name(code: i32) -> Option<&'static str> {
    let name = match code {
        OK => "ok",
        SERVER_ERROR => "server_error",
        KEY_NOT_FOUND => "key_not_found",
        GENERATION_ERROR => "generation_error",
        PARAMETER_ERROR => "parameter_error",
        KEY_EXISTS => "key_exists",
        BIN_EXISTS => "bin_exists",
        CLUSTER_KEY_MISMATCH => "cluster_key_mismatch",
        SERVER_MEM_ERROR => "server_mem_error",
        TIMEOUT => "timeout",
        ALWAYS_FORBIDDEN => "always_forbidden",
        PARTITION_UNAVAILABLE => "partition_unavailable",
        BIN_TYPE_ERROR => "bin_type_error",
        RECORD_TOO_BIG => "record_too_big",
        KEY_BUSY => "key_busy",
        SCAN_ABORT => "scan_abort",
        UNSUPPORTED_FEATURE => "unsupported_feature",
        BIN_NOT_FOUND => "bin_not_found",
        DEVICE_OVERLOAD => "device_overload",
        KEY_MISMATCH => "key_mismatch",
        INVALID_NAMESPACE => "invalid_namespace",
        BIN_NAME_TOO_LONG => "bin_name_too_long",
        FAIL_FORBIDDEN => "fail_forbidden",
        ELEMENT_NOT_FOUND => "element_not_found",
        ELEMENT_EXISTS => "element_exists",
        ENTERPRISE_ONLY => "enterprise_only",
        OP_NOT_APPLICABLE => "op_not_applicable",
        FILTERED_OUT => "filtered_out",
        LOST_CONFLICT => "lost_conflict",
        _ => return None,
    };
    Some(name)
}

#[cfg(test)]
mod tests {
    #[test]
    fn names() {
        assert_eq!(super::name(super::OK), Some("ok"));
        assert_eq!(super::name(super::KEY_NOT_FOUND), Some("key_not_found"));
        assert_eq!(super::name(-17), None);
    }
}
