pub mod gemini_http;
pub mod retrying;

pub use self::gemini_http::{API_KEY_ENV, GeminiClient};
pub use self::retrying::{RetryPolicy, RetryingLlmClient};
