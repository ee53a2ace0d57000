// ABOUTME: System-wide constants for the Larder recipe API
// ABOUTME: Resource caps, session defaults, and error message text
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder

//! Application constants.

/// Resource limits
pub mod limits {
    /// Maximum recipes a single user may author
    pub const MAX_RECIPES_PER_USER: i64 = 50;

    /// Maximum items in a user's pantry
    pub const MAX_PANTRY_ITEMS: i64 = 100;

    /// JWT session lifetime in hours (30 days, matching the original app)
    pub const SESSION_EXPIRY_HOURS: i64 = 30 * 24;

    /// Minimum password length accepted at registration
    pub const MIN_PASSWORD_LENGTH: usize = 6;

    /// Username length bounds
    pub const MIN_USERNAME_LENGTH: usize = 3;
    pub const MAX_USERNAME_LENGTH: usize = 30;

    /// Recipe title length bounds
    pub const MIN_TITLE_LENGTH: usize = 3;
    pub const MAX_TITLE_LENGTH: usize = 100;

    /// Recipe description length bounds
    pub const MIN_DESCRIPTION_LENGTH: usize = 10;
    pub const MAX_DESCRIPTION_LENGTH: usize = 1000;

    /// Default window for the expiring-pantry query, in days
    pub const DEFAULT_EXPIRY_WINDOW_DAYS: i64 = 7;
}

/// Time conversion constants
pub mod time_constants {
    /// Seconds per hour
    pub const SECONDS_PER_HOUR: u32 = 3600;
}

/// Canonical error message text shared across handlers
pub mod error_messages {
    pub const INVALID_CREDENTIALS: &str = "Invalid email or password";
    pub const INVALID_EMAIL_FORMAT: &str = "Please provide a valid email";
    pub const PASSWORD_TOO_WEAK: &str = "Password must be at least 6 characters long";
    pub const USER_ALREADY_EXISTS: &str = "User already exists";
    pub const USERNAME_TAKEN: &str = "Username already exists";
    pub const RECIPE_LIMIT_REACHED: &str =
        "Maximum recipe limit reached (50 recipes). Please delete some recipes before adding new ones.";
    pub const PANTRY_LIMIT_REACHED: &str =
        "Maximum pantry limit reached (100 items). Please remove some items before adding new ones.";
}

/// Service identity
pub mod service_names {
    /// Service name used in logs and JWT audience claims
    pub const LARDER_SERVER: &str = "larder-server";
}
