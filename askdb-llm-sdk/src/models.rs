//! Model name constants, grouped by provider.

pub mod gemini {
    pub const GEMINI_2_5_PRO: &str = "gemini-2.5-pro";
    pub const GEMINI_2_5_FLASH: &str = "gemini-2.5-flash";
}
