// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::DomainError;

#[test]
fn test_sequencing_errors_name_the_missing_step() {
    assert_eq!(
        DomainError::MustClockInFirst.to_string(),
        "Cannot clock out: must clock in first"
    );
    assert_eq!(
        DomainError::MustStartBreakFirst.to_string(),
        "Cannot end break: must start break first"
    );
}

#[test]
fn test_duplicate_error_reports_window() {
    let error: DomainError = DomainError::DuplicatePunch { window_seconds: 60 };
    assert!(error.to_string().contains("60"));
}

#[test]
fn test_page_size_error_reports_offending_value() {
    let error: DomainError = DomainError::InvalidPageSize { page_size: 250 };
    assert_eq!(
        error.to_string(),
        "Page size must be between 1 and 100, got 250"
    );
}

#[test]
fn test_errors_implement_std_error() {
    let error: Box<dyn std::error::Error> = Box::new(DomainError::AlreadyClockedIn);
    assert!(!error.to_string().is_empty());
}
