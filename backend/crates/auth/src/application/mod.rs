//! Application Layer
//!
//! Use cases and application services.

pub mod ban_user;
pub mod config;
pub mod external_sign_in;
pub mod refresh_token;
pub mod session;
pub mod sign_in;
pub mod sign_out;
pub mod sign_up;
pub mod token;
pub mod validate_token;

// Re-exports
pub use ban_user::{BanUserInput, BanUserUseCase};
pub use config::AuthConfig;
pub use external_sign_in::ExternalSignInUseCase;
pub use refresh_token::RefreshTokenUseCase;
pub use session::AuthPayload;
pub use sign_in::{SignInInput, SignInUseCase};
pub use sign_out::SignOutUseCase;
pub use sign_up::{SignUpInput, SignUpUseCase};
pub use token::{AccessToken, Claims, TokenIssuer};
pub use validate_token::ValidateTokenUseCase;
