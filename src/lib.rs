//! # JSX Editor Native Core
//!
//! Source-patching engine behind the in-browser visual editor: instrument
//! JSX with file/line/column provenance at build time, then round-trip
//! attribute edits back into the original source via span-level patching.
//!
//! ## Source-Patching Invariants
//!
//! 1. **Single edit**: a successful update changes exactly one attribute on
//!    exactly one opening tag. Every other byte of the file survives the
//!    round-trip unchanged.
//! 2. **Write last**: nothing touches the file system until the patched
//!    text is fully regenerated. Read, parse and locate failures leave the
//!    file exactly as it was.
//! 3. **Layout preservation**: regeneration is span splicing into the
//!    original text, never a reprint. Line numbers of unmodified code stay
//!    stable, so instrumented coordinates keep working across edits.
//! 4. **First match wins**: the locator visits opening tags in document
//!    order; the first tag at the target coordinate is the target.
//! 5. **Static values only**: a `className` backed by an expression is
//!    refused with `UNSUPPORTED_DYNAMIC_CLASSNAME` — rewriting it to a
//!    literal would silently destroy programmer-authored logic.
//! 6. **Fresh tree per request**: every update re-reads and re-parses disk
//!    content, so concurrent external edits are picked up naturally.

#[cfg(feature = "napi")]
use napi_derive::napi;

mod actions;
mod bridge;
mod cache;
mod contracts;
mod discovery;
mod inject;
mod instrument;
mod locate;
mod patch;
mod update;


pub use actions::{
    class_name_editor_action, ActionKind, ActionRegistration, ActionRegistry, OperationContext,
    OperationHandler, RegistryError,
};
pub use bridge::{ActionBridge, BridgeOptions, BridgeResponse};
pub use cache::InstrumentationCache;
pub use contracts::{
    ErrorCode, OperationResult, RuntimeActionRef, RuntimeBootstrapPayload, SelectionRef,
    UpdateError, UpdateRequest,
};
pub use discovery::{find_instrumentable_files, instrument_project, InstrumentedFile};
pub use inject::render_bootstrap_tag;
pub use instrument::{clean_bundler_id, instrument_source, InstrumentOptions, InstrumentedSource};
pub use locate::{
    collect_opening_elements, locate_opening_element, source_type_for_path, AttributeValueKind,
    LineIndex, LocatedAttribute, LocatedElement,
};
pub use patch::{apply_edits, set_string_attribute, PatchError, SourceEdit};
pub use update::{update_class_name, UpdateOutcome};

#[cfg(feature = "napi")]
pub use instrument::instrument_source_native;
#[cfg(feature = "napi")]
pub use update::update_class_name_native;

#[cfg(feature = "napi")]
#[napi]
pub fn editor_bridge() -> String {
    "Editor Native Bridge Connected".to_string()
}
