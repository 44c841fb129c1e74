/*!
 * Authentication context extractor
 *
 * Responsibility:
 * - Hand the authenticated caller (AuthCtx) to handlers
 * - axum-specific code stays in core, the type itself in types
 */

mod core;
mod types;

pub use self::core::AuthCtxExtractor;
pub use self::types::AuthCtx;
