// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Static hold-reason table for rendering HELD worker states.
//!
//! Codes and messages follow the scheduler's documented hold reasons. A few
//! codes carry a per-subcode lookup (grid universes) or a label describing
//! what the subcode means (usually an errno).

struct HoldReason {
    message: &'static str,
    subcode_lookup: &'static [(i64, &'static str)],
    subcode_meaning: Option<&'static str>,
}

const fn plain(message: &'static str) -> HoldReason {
    HoldReason {
        message,
        subcode_lookup: &[],
        subcode_meaning: None,
    }
}

const fn with_meaning(message: &'static str, meaning: &'static str) -> HoldReason {
    HoldReason {
        message,
        subcode_lookup: &[],
        subcode_meaning: Some(meaning),
    }
}

const fn with_lookup(
    message: &'static str,
    subcode_lookup: &'static [(i64, &'static str)],
) -> HoldReason {
    HoldReason {
        message,
        subcode_lookup,
        subcode_meaning: None,
    }
}

const HOLD_REASONS: &[(i64, HoldReason)] = &[
    (1, plain("The user put the job on hold with condor_hold")),
    (
        3,
        with_meaning(
            "The PERIODIC_HOLD expression evaluated to True. Or, ON_EXIT_HOLD was true",
            "User Specified",
        ),
    ),
    (4, plain("The credentials for the job are invalid")),
    (5, plain("A job policy expression evaluated to Undefined")),
    (
        6,
        with_meaning("The condor_starter failed to start the executable", "Errno"),
    ),
    (
        7,
        with_meaning(
            "The standard output file for the job could not be opened",
            "Errno",
        ),
    ),
    (
        8,
        with_meaning(
            "The standard input file for the job could not be opened",
            "Errno",
        ),
    ),
    (
        9,
        with_meaning(
            "The standard output stream for the job could not be opened",
            "Errno",
        ),
    ),
    (
        10,
        with_meaning(
            "The standard input stream for the job could not be opened",
            "Errno",
        ),
    ),
    (
        11,
        plain("An internal HTCondor protocol error was encountered when transferring files"),
    ),
    (
        12,
        with_meaning(
            "An error occurred while transferring job output files or self-checkpoint files",
            "Errno or plug-in error",
        ),
    ),
    (
        13,
        with_meaning(
            "An error occurred while transferring job input files",
            "Errno or plug-in error",
        ),
    ),
    (
        14,
        with_meaning(
            "The initial working directory of the job cannot be accessed",
            "Errno",
        ),
    ),
    (15, plain("The user requested the job be submitted on hold")),
    (16, plain("Input files are being spooled")),
    (
        17,
        plain(
            "A standard universe job is not compatible with the condor_shadow version available \
             on the submitting machine",
        ),
    ),
    (
        18,
        plain("An internal HTCondor protocol error was encountered when transferring files"),
    ),
    (
        19,
        plain(
            "<Keyword>_HOOK_PREPARE_JOB was defined but could not be executed or returned failure",
        ),
    ),
    (
        20,
        plain("The job missed its deferred execution time and therefore failed to run"),
    ),
    (
        21,
        plain("The job was put on hold because WANT_HOLD in the machine policy was true"),
    ),
    (22, plain("Unable to initialize job event log")),
    (23, plain("Failed to access user account")),
    (24, plain("No compatible shadow")),
    (25, plain("Invalid cron settings")),
    (26, plain("SYSTEM_PERIODIC_HOLD evaluated to true")),
    (
        27,
        plain("The system periodic job policy evaluated to undefined"),
    ),
    (
        32,
        plain(
            "The maximum total input file transfer size was exceeded. (See MAX_TRANSFER_INPUT_MB)",
        ),
    ),
    (
        33,
        plain(
            "The maximum total output file transfer size was exceeded. \
             (See MAX_TRANSFER_OUTPUT_MB)",
        ),
    ),
    (34, plain("Memory usage exceeds a memory limit")),
    (35, plain("Specified Docker image was invalid")),
    (
        36,
        plain("Job failed when sent the checkpoint signal it requested"),
    ),
    (
        37,
        with_lookup(
            "User error in the EC2 universe",
            &[
                (1, "Public key file not defined"),
                (2, "Private key file not defined"),
                (4, "Grid resource string missing EC2 service URL"),
                (9, "Failed to authenticate"),
                (10, "Can't use existing SSH keypair with the given server's type"),
                (20, "You, or somebody like you, cancelled this request"),
            ],
        ),
    ),
    (
        38,
        with_lookup(
            "Internal error in the EC2 universe",
            &[
                (3, "Grid resource type not EC2"),
                (5, "Grid resource type not set"),
                (7, "Grid job ID is not for EC2"),
                (21, "Unexpected remote job status"),
            ],
        ),
    ),
    (
        39,
        with_lookup(
            "Adminstrator error in the EC2 universe",
            &[(6, "EC2_GAHP not defined")],
        ),
    ),
    (
        40,
        with_lookup(
            "Connection problem in the EC2 universe",
            &[
                (11, "while creating an SSH keypair"),
                (12, "while starting an on-demand instance"),
                (17, "while requesting a spot instance"),
            ],
        ),
    ),
    (
        41,
        with_lookup(
            "Server error in the EC2 universe",
            &[
                (13, "Abnormal instance termination reason"),
                (14, "Unrecognized instance termination reason"),
                (22, "Resource was down for too long"),
            ],
        ),
    ),
    (
        42,
        with_lookup(
            "Instance potentially lost due to an error in the EC2 universe",
            &[
                (15, "Connection error while terminating an instance"),
                (16, "Failed to terminate instance too many times"),
                (17, "Connection error while terminating a spot request"),
                (18, "Failed to terminated a spot request too many times"),
                (19, "Spot instance request purged before instance ID acquired"),
            ],
        ),
    ),
    (43, plain("Pre script failed")),
    (44, plain("Post script failed")),
    (
        45,
        plain("Test of singularity runtime failed before launching a job"),
    ),
    (46, plain("The job's allowed duration was exceeded")),
    (47, plain("The job's allowed execution time was exceeded")),
    (
        48,
        plain(
            "Prepare job shadow hook failed when it was executed; status code indicated job \
             should be held",
        ),
    ),
];

fn lookup(code: i64) -> Option<&'static HoldReason> {
    HOLD_REASONS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, r)| r)
}

/// Render a hold `(code, subcode)` pair as a human-readable message.
///
/// Subcode 0 means "no qualifier". Unknown codes render as
/// `"{code}: {subcode} (unknown)"` so the raw pair still surfaces.
pub fn hold_reason_to_string(code: i64, subcode: i64) -> String {
    let Some(reason) = lookup(code) else {
        return format!("{}: {} (unknown)", code, subcode);
    };

    if subcode == 0 {
        return reason.message.to_string();
    }

    if !reason.subcode_lookup.is_empty() {
        let subreason = reason
            .subcode_lookup
            .iter()
            .find(|(c, _)| *c == subcode)
            .map(|(_, s)| (*s).to_string())
            .unwrap_or_else(|| subcode.to_string());
        return format!("{}: {}", reason.message, subreason);
    }

    match reason.subcode_meaning {
        Some(meaning) => format!("{}: {} ({})", reason.message, subcode, meaning),
        None => format!("{}: {} (unknown)", reason.message, subcode),
    }
}

#[cfg(test)]
#[path = "hold_reasons_tests.rs"]
mod tests;
