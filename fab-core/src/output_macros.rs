//! Output macros for user-facing progress lines.
//!
//! Provisioning runs are long and human-supervised, so every step narrates
//! itself on stderr with a status glyph. Structured diagnostics go through
//! `tracing` instead.

#[macro_export]
macro_rules! fab_println {
    () => {
        println!();
    };
    ($($arg:tt)*) => {
        println!("{}", format!($($arg)*));
    }
}

#[macro_export]
macro_rules! fab_error {
    ($($arg:tt)*) => {
        eprintln!("✗ {}", format!($($arg)*));
    }
}

#[macro_export]
macro_rules! fab_error_with_details {
    ($main:expr, $details:expr) => {
        eprintln!("✗ {}", $main);
        for detail in $details {
            eprintln!("   └─ {}", detail);
        }
    };
}

#[macro_export]
macro_rules! fab_success {
    ($($arg:tt)*) => {
        eprintln!("✓ {}", format!($($arg)*));
    };
}

#[macro_export]
macro_rules! fab_info {
    ($($arg:tt)*) => {
        eprintln!("ℹ {}", format!($($arg)*));
    };
}

#[macro_export]
macro_rules! fab_warning {
    ($($arg:tt)*) => {
        eprintln!("⚠ {}", format!($($arg)*));
    };
}

#[macro_export]
macro_rules! fab_progress {
    ($($arg:tt)*) => {
        eprintln!("▶ {}", format!($($arg)*));
    };
}

#[macro_export]
macro_rules! fab_section {
    ($($arg:tt)*) => {
        eprintln!("\n===== {} =====", format!($($arg)*));
    };
}
