// Utility functions and validation

pub mod validation {
    /// Validate a SteamID64: exactly 17 ASCII digits starting with 7
    pub fn is_valid_steam_id(id: &str) -> bool {
        id.len() == 17 && id.starts_with('7') && id.bytes().all(|b| b.is_ascii_digit())
    }
}

pub mod pagination {
    /// Hard cap on audit log page size
    pub const MAX_PER_PAGE: i64 = 200;

    /// Clamp a requested page size into [1, MAX_PER_PAGE]
    pub fn clamp_per_page(per_page: i64) -> i64 {
        per_page.clamp(1, MAX_PER_PAGE)
    }

    /// Pages are 1-based; anything below 1 means the first page
    pub fn normalize_page(page: i64) -> i64 {
        page.max(1)
    }

    /// Number of pages needed for `total` rows, zero when the table is empty
    pub fn total_pages(total: i64, per_page: i64) -> i64 {
        if total <= 0 {
            0
        } else {
            (total + per_page - 1) / per_page
        }
    }
}
