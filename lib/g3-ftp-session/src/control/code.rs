/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

//! FTP reply codes, see RFC 959, RFC 2228 and RFC 2428.

pub const RESTART_MARKER: u16 = 110;
pub const SERVICE_NOT_READY: u16 = 120;
pub const DATA_CONNECTION_ALREADY_OPEN: u16 = 125;
pub const FILE_STATUS_OK: u16 = 150;
pub const COMMAND_OK: u16 = 200;
pub const COMMAND_IS_SUPERFLUOUS: u16 = 202;
pub const SYSTEM_STATUS: u16 = 211;
pub const DIRECTORY_STATUS: u16 = 212;
pub const FILE_STATUS: u16 = 213;
pub const HELP_MESSAGE: u16 = 214;
pub const NAME_SYSTEM_TYPE: u16 = 215;
pub const SERVICE_READY: u16 = 220;
pub const SERVICE_CLOSING_CONTROL_CONNECTION: u16 = 221;
pub const DATA_CONNECTION_OPEN: u16 = 225;
pub const CLOSING_DATA_CONNECTION: u16 = 226;
pub const ENTERING_PASSIVE_MODE: u16 = 227;
pub const ENTERING_EPSV_MODE: u16 = 229;
pub const USER_LOGGED_IN: u16 = 230;
pub const SECURITY_DATA_EXCHANGE_COMPLETE: u16 = 234;
pub const SECURITY_DATA_EXCHANGE_SUCCESSFULLY: u16 = 235;
pub const FILE_ACTION_OK: u16 = 250;
pub const PATHNAME_CREATED: u16 = 257;
pub const NEED_PASSWORD: u16 = 331;
pub const NEED_ACCOUNT: u16 = 332;
pub const SECURITY_MECHANISM_IS_OK: u16 = 334;
pub const SECURITY_DATA_IS_ACCEPTABLE: u16 = 335;
pub const FILE_ACTION_PENDING: u16 = 350;
pub const SERVICE_NOT_AVAILABLE: u16 = 421;
pub const CANNOT_OPEN_DATA_CONNECTION: u16 = 425;
pub const TRANSFER_ABORTED: u16 = 426;
pub const UNAVAILABLE_RESOURCE: u16 = 431;
pub const FILE_ACTION_NOT_TAKEN: u16 = 450;
pub const ACTION_ABORTED: u16 = 451;
pub const INSUFFICIENT_STORAGE: u16 = 452;
pub const UNRECOGNIZED_COMMAND: u16 = 500;
pub const SYNTAX_ERROR_IN_ARGUMENTS: u16 = 501;
pub const COMMAND_NOT_IMPLEMENTED: u16 = 502;
pub const BAD_COMMAND_SEQUENCE: u16 = 503;
pub const COMMAND_NOT_IMPLEMENTED_FOR_PARAMETER: u16 = 504;
pub const EXTENDED_PORT_FAILURE: u16 = 522;
pub const NOT_LOGGED_IN: u16 = 530;
pub const NEED_ACCOUNT_FOR_STORING_FILES: u16 = 532;
pub const DENIED_FOR_POLICY_REASONS: u16 = 533;
pub const REQUEST_DENIED: u16 = 534;
pub const FAILED_SECURITY_CHECK: u16 = 535;
pub const REQUESTED_PROT_LEVEL_NOT_SUPPORTED: u16 = 536;
pub const FILE_UNAVAILABLE: u16 = 550;
pub const PAGE_TYPE_UNKNOWN: u16 = 551;
pub const STORAGE_ALLOCATION_EXCEEDED: u16 = 552;
pub const FILE_NAME_NOT_ALLOWED: u16 = 553;

/// 1yz, the action is being started, expect another reply
#[inline]
pub fn is_positive_preliminary(code: u16) -> bool {
    (100..200).contains(&code)
}

/// 2yz
#[inline]
pub fn is_positive_completion(code: u16) -> bool {
    (200..300).contains(&code)
}

/// 3yz, more information is needed
#[inline]
pub fn is_positive_intermediate(code: u16) -> bool {
    (300..400).contains(&code)
}

/// 4yz, the command may succeed if retried
#[inline]
pub fn is_negative_transient(code: u16) -> bool {
    (400..500).contains(&code)
}

/// 5yz
#[inline]
pub fn is_negative_permanent(code: u16) -> bool {
    (500..600).contains(&code)
}

/// 6yz, RFC 2228 protected replies
#[inline]
pub fn is_protected(code: u16) -> bool {
    (600..700).contains(&code)
}
