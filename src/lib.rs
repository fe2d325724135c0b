//! Ascending config file discovery for Rust applications. Name your tool,
//! drop a config file anywhere above the project root, and go.
//!
//! Confsearch finds and loads a tool's configuration by walking up from a
//! starting directory, probing an ordered list of candidate filenames in each
//! directory, and parsing the first match with a format loader chosen by
//! filename. This is how `.editorconfig`, `.eslintrc`, and friends behave —
//! without each tool reimplementing directory walking, caching, and
//! multi-format parsing.
//!
//! ```ignore
//! let finder = Confsearch::builder("myapp").build_sync();
//! match finder.search()? {
//!     SearchOutcome::Found { config, filepath } => run_with(config, filepath),
//!     SearchOutcome::Empty { filepath } => disabled_by(filepath),
//!     SearchOutcome::NotFound => run_with_defaults(),
//! }
//! ```
//!
//! That single call resolves the working directory, checks `.myapprc`,
//! `.myapprc.json`, `.myapprc.yaml`, `.myapprc.toml` (and friends) in each
//! ancestor directory, parses the first hit, and caches the outcome for every
//! directory it visited.
//!
//! # Why confsearch
//!
//! Project-local configuration lives *somewhere above* the file being worked
//! on: the project root, a parent monorepo, the user's home directory. The
//! typical approach is a hand-rolled loop over `Path::ancestors` with ad hoc
//! filename checks and format sniffing, duplicated per tool and subtly
//! different in each. Confsearch replaces that loop with one engine that
//! pins down the details tools get wrong: candidate precedence within a
//! directory, what a blank file means, when ascent stops, what is cached,
//! and what counts as an error.
//!
//! # The three outcomes
//!
//! Every search and load produces a [`SearchOutcome`], and callers match on
//! exactly three shapes:
//!
//! - [`Found`](SearchOutcome::Found) — a file matched and parsed; carries the
//!   value and the absolute path that produced it.
//! - [`Empty`](SearchOutcome::Empty) — a candidate exists but is blank.
//!   Distinct from absence so "the user dropped an empty rc file to disable
//!   the tool" is detectable.
//! - [`NotFound`](SearchOutcome::NotFound) — nothing matched anywhere.
//!   Not an error: a tool without config is a normal situation.
//!
//! # Search semantics
//!
//! Within a directory, places are probed in list order and the first terminal
//! result wins — `[a, b]` means `a` beats `b` even when both exist. Across
//! directories, the walk is strictly bottom-up: the match nearest the start
//! directory wins. A blank file is skipped by default; with
//! [`stop_on_empty`](FinderBuilder::stop_on_empty) it instead halts the
//! search on the spot. When the whole ascent comes up dry and
//! [`xdg`](FinderBuilder::xdg) is enabled, one more pass runs over the
//! platform config directory for the package (`~/.config/myapp` on Linux).
//!
//! `load` is the non-searching sibling: it takes an explicit path, and a
//! missing file is a hard error rather than a routine miss.
//!
//! # Two engines, one behavior
//!
//! [`Finder`] suspends at every read and loader call; [`FinderSync`] blocks.
//! Both are built from the same [`FinderBuilder`] and share the policy layer
//! that decides stop conditions, directory advance, and content
//! classification, so their observable behavior is identical. The
//! non-blocking engine additionally deduplicates concurrent work: two tasks
//! searching the same uncached directory trigger one filesystem walk, not
//! two.
//!
//! # Caching
//!
//! Each finder owns two caches: directory → outcome for searches and file →
//! outcome for loads. Every directory visited during an ascent is a caching
//! point, so a later search starting anywhere along a previously walked path
//! is answered without touching the filesystem. Cached values are
//! post-transform; failures are never cached, so a transient read error does
//! not poison a key. Both caches are on by default and controlled by
//! [`cache`](FinderBuilder::cache) /
//! [`search_cache`](FinderBuilder::search_cache) /
//! [`load_cache`](FinderBuilder::load_cache), with explicit
//! `clear_search_cache` / `clear_load_cache` / `clear_caches` hooks on both
//! engines.
//!
//! # Loaders
//!
//! A [`Loader`] parses file content into a `serde_json::Value`. JSON, YAML,
//! and TOML are built in, keyed by extension; extensionless rc files fall
//! back to YAML (a superset of JSON, so both styles of rc content work).
//! Register custom loaders by extension or exact filename on the builder. A
//! file matched by a search place with no resolvable loader is a
//! configuration error, surfaced as
//! [`NoLoader`](ConfsearchError::NoLoader) — not silently skipped.
//!
//! # Transform
//!
//! A [`transform`](FinderBuilder::transform) hook runs over the terminal
//! outcome of every search and load — including `NotFound` and `Empty`, so
//! it can normalize values, substitute defaults, or veto a result by
//! returning an error. The transform runs once per computed result; cache
//! hits return the already-transformed value.
//!
//! # Error handling
//!
//! All fallible operations return [`ConfsearchError`]. A missing candidate
//! during search and a blank file are not errors — they are encoded in the
//! outcome. Everything else (unreadable file, unparseable content, missing
//! loader, missing explicit load target, empty load path) aborts the whole
//! operation and propagates.

pub mod error;
pub mod loaders;
pub mod types;

mod base;
mod builder;
mod cache;
mod finder;
mod finder_sync;
mod io;
mod paths;

#[cfg(test)]
mod fixtures;

pub use builder::{Confsearch, FinderBuilder};
pub use error::ConfsearchError;
pub use finder::Finder;
pub use finder_sync::FinderSync;
pub use io::{FileReader, FsReader};
pub use loaders::{JsonLoader, Loader, LoaderRegistry, TomlLoader, YamlLoader};
pub use types::{SearchOutcome, Transform};
