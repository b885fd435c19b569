//! The process-wide schema registry.
//!
//! Every parameter the engine recognizes is declared here, exactly once, in
//! canonical order (the order whisper.cpp presents its full-params surface).
//! The table is built once behind a `LazyLock` and never mutated, so any
//! number of concurrent validations can read it without coordination.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use crate::value::Value;

/// Sampling strategy selector values (`strategy`).
pub const STRATEGY_GREEDY: i64 = 0;
pub const STRATEGY_BEAM_SEARCH: i64 = 1;

/// Parameter names referenced outside the table itself.
pub const STRATEGY: &str = "strategy";
pub const N_THREADS: &str = "n_threads";
pub const LANGUAGE: &str = "language";
pub const GREEDY: &str = "greedy";
pub const BEAM_SEARCH: &str = "beam_search";
pub const BEST_OF: &str = "best_of";
pub const BEAM_SIZE: &str = "beam_size";
pub const PATIENCE: &str = "patience";

static STRATEGY_OPTIONS: [Value; 2] = [
    Value::Integer(STRATEGY_GREEDY),
    Value::Integer(STRATEGY_BEAM_SEARCH),
];

/// Declared kind of a registered parameter.
///
/// This is a closed set: validation is a single dispatch over these variants.
/// The `Group` variant carries its own mini-schema, validated recursively
/// with the same rules as top-level parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Integer,
    Float,
    Boolean,
    Text,
    TokenSequence,
    Group(&'static [FieldSpec]),
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamKind::Integer => "integer",
            ParamKind::Float => "float",
            ParamKind::Boolean => "boolean",
            ParamKind::Text => "string",
            ParamKind::TokenSequence => "token sequence",
            ParamKind::Group(_) => "sub-config",
        };
        f.write_str(name)
    }
}

/// One field of a sub-configuration group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: ParamKind,
}

const GREEDY_FIELDS: &[FieldSpec] = &[FieldSpec {
    name: BEST_OF,
    kind: ParamKind::Integer,
}];

const BEAM_SEARCH_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: BEAM_SIZE,
        kind: ParamKind::Integer,
    },
    FieldSpec {
        name: PATIENCE,
        kind: ParamKind::Float,
    },
];

/// Static descriptor for one registered parameter.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    /// Unique parameter name, identical to whisper.cpp's field name.
    pub name: &'static str,

    /// Declared value kind.
    pub kind: ParamKind,

    /// Optional finite set of valid values. Absent means unconstrained.
    pub allowed: Option<&'static [Value]>,

    /// Default substituted when the parameter is absent from the raw
    /// configuration. [`Value::Auto`] marks a deferred default resolved at
    /// dispatch time.
    pub default: Value,

    /// Informational only: the engine's support for this parameter is
    /// experimental. Supplying it is accepted, never rejected.
    pub experimental: bool,

    /// Informational only: the parameter is accepted and carried but the
    /// engine ignores it. Supplying it is accepted, never rejected.
    pub not_implemented: bool,
}

fn spec(name: &'static str, kind: ParamKind, default: Value) -> ParamSpec {
    ParamSpec {
        name,
        kind,
        allowed: None,
        default,
        experimental: false,
        not_implemented: false,
    }
}

impl ParamSpec {
    fn allowed(mut self, allowed: &'static [Value]) -> Self {
        self.allowed = Some(allowed);
        self
    }

    fn experimental(mut self) -> Self {
        self.experimental = true;
        self
    }

    fn not_implemented(mut self) -> Self {
        self.not_implemented = true;
        self
    }
}

fn group(fields: &[(&str, Value)]) -> Value {
    let mut map = BTreeMap::new();
    for (name, value) in fields {
        map.insert((*name).to_string(), value.clone());
    }
    Value::Group(map)
}

/// The immutable registry of every recognized parameter.
pub struct Registry {
    specs: Vec<ParamSpec>,
    index: HashMap<&'static str, usize>,
}

static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::build);

impl Registry {
    /// Access the process-wide registry, building it on first use.
    pub fn global() -> &'static Registry {
        &REGISTRY
    }

    /// Look up a parameter by name.
    pub fn lookup(&self, name: &str) -> Option<&ParamSpec> {
        self.index.get(name).map(|&i| &self.specs[i])
    }

    /// All registered names in canonical declaration order.
    ///
    /// This order is what makes error reporting and default-set construction
    /// deterministic.
    pub fn all_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.specs.iter().map(|spec| spec.name)
    }

    /// All specs in canonical declaration order.
    pub fn specs(&self) -> &[ParamSpec] {
        &self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    fn build() -> Registry {
        use ParamKind::{Boolean, Float, Integer, Text, TokenSequence};

        let specs = vec![
            // GreedyDecoder -> 0, BeamSearchDecoder -> 1
            spec(STRATEGY, Integer, Value::Integer(STRATEGY_GREEDY)).allowed(&STRATEGY_OPTIONS),
            // Threads to allocate for inference; resolved at dispatch time to
            // min(4, available hardware concurrency).
            spec(N_THREADS, Integer, Value::Auto),
            // Max tokens of past text to use as decoder prompt.
            spec("n_max_text_ctx", Integer, Value::Integer(16384)),
            spec("offset_ms", Integer, Value::Integer(0)),
            spec("duration_ms", Integer, Value::Integer(0)),
            // Translate to English instead of transcribing verbatim.
            spec("translate", Boolean, Value::Boolean(false)),
            spec("no_context", Boolean, Value::Boolean(false)),
            spec("single_segment", Boolean, Value::Boolean(false)),
            spec("print_special", Boolean, Value::Boolean(false)),
            spec("print_progress", Boolean, Value::Boolean(true)),
            spec("print_realtime", Boolean, Value::Boolean(false)),
            spec("print_timestamps", Boolean, Value::Boolean(true)),
            // Token-level timestamps.
            spec("token_timestamps", Boolean, Value::Boolean(false)).experimental(),
            // Timestamp token probability thresholds (~0.01).
            spec("thold_pt", Float, Value::Float(0.01)),
            spec("thold_ptsum", Float, Value::Float(0.01)),
            // Max segment length in characters.
            spec("max_len", Integer, Value::Integer(0)),
            spec("split_on_word", Boolean, Value::Boolean(false)),
            // Max tokens per segment (0 = no limit).
            spec("max_tokens", Integer, Value::Integer(0)),
            // 2x speed-up via Phase Vocoder; can reduce output quality.
            spec("speed_up", Boolean, Value::Boolean(false)).experimental(),
            // Overwrite the audio context size (0 = use default).
            spec("audio_ctx", Integer, Value::Integer(0)),
            // Initial decoder prompt.
            spec("prompt_tokens", TokenSequence, Value::Tokens(Vec::new())),
            spec("prompt_n_tokens", Integer, Value::Integer(0)),
            // Auto-detection is requested with null, "" or "auto".
            spec(LANGUAGE, Text, Value::Text("en".to_string())),
            spec("suppress_blank", Boolean, Value::Boolean(true)),
            spec("suppress_non_speech_tokens", Boolean, Value::Boolean(false)),
            // Initial decoding temperature.
            spec("temperature", Float, Value::Float(0.0)),
            spec("max_initial_ts", Float, Value::Float(1.0)),
            spec("length_penalty", Float, Value::Float(-1.0)),
            spec("temperature_inc", Float, Value::Float(0.2)),
            // Similar to OpenAI's "compression_ratio_threshold".
            spec("entropy_thold", Float, Value::Float(2.4)),
            spec("logprob_thold", Float, Value::Float(-1.0)),
            // Accepted and carried, but the engine ignores it.
            spec("no_speech_thold", Float, Value::Float(0.6)).not_implemented(),
            spec(
                GREEDY,
                ParamKind::Group(GREEDY_FIELDS),
                group(&[(BEST_OF, Value::Integer(-1))]),
            ),
            spec(
                BEAM_SEARCH,
                ParamKind::Group(BEAM_SEARCH_FIELDS),
                group(&[
                    (BEAM_SIZE, Value::Integer(-1)),
                    (PATIENCE, Value::Float(-1.0)),
                ]),
            ),
        ];

        let mut index = HashMap::with_capacity(specs.len());
        for (i, spec) in specs.iter().enumerate() {
            let previous = index.insert(spec.name, i);
            debug_assert!(previous.is_none(), "duplicate parameter name {}", spec.name);
        }

        Registry { specs, index }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_matches_kind(kind: ParamKind, default: &Value) -> bool {
        match kind {
            ParamKind::Integer => matches!(default, Value::Integer(_) | Value::Auto),
            ParamKind::Float => matches!(default, Value::Float(_)),
            ParamKind::Boolean => matches!(default, Value::Boolean(_)),
            ParamKind::Text => matches!(default, Value::Text(_)),
            ParamKind::TokenSequence => matches!(default, Value::Tokens(_)),
            ParamKind::Group(fields) => match default {
                Value::Group(map) => {
                    map.len() == fields.len()
                        && fields.iter().all(|field| {
                            map.get(field.name)
                                .is_some_and(|v| default_matches_kind(field.kind, v))
                        })
                }
                _ => false,
            },
        }
    }

    #[test]
    fn lookup_finds_every_registered_name() {
        let registry = Registry::global();
        for name in registry.all_names() {
            let spec = registry.lookup(name).expect("registered name must resolve");
            assert_eq!(spec.name, name);
        }
    }

    #[test]
    fn lookup_misses_unregistered_names() {
        assert!(Registry::global().lookup("n_thread").is_none());
        assert!(Registry::global().lookup("").is_none());
    }

    #[test]
    fn registry_mirrors_the_full_params_surface() {
        let registry = Registry::global();
        assert_eq!(registry.len(), 34);

        // Declaration order is the canonical order.
        let names: Vec<_> = registry.all_names().collect();
        assert_eq!(names.first(), Some(&STRATEGY));
        assert_eq!(names.last(), Some(&BEAM_SEARCH));
    }

    #[test]
    fn every_default_is_consistent_with_its_declared_kind() {
        for spec in Registry::global().specs() {
            assert!(
                default_matches_kind(spec.kind, &spec.default),
                "default for `{}` does not match its declared kind",
                spec.name
            );
        }
    }

    #[test]
    fn allowed_values_match_their_declared_kind() {
        for spec in Registry::global().specs() {
            let Some(allowed) = spec.allowed else { continue };
            assert!(!allowed.is_empty());
            for value in allowed {
                assert!(
                    default_matches_kind(spec.kind, value),
                    "allowed value for `{}` does not match its declared kind",
                    spec.name
                );
            }
        }
    }

    #[test]
    fn deferred_defaults_are_explicit_sentinels() {
        let spec = Registry::global().lookup(N_THREADS).expect("n_threads");
        assert!(spec.default.is_auto());

        // n_threads is the only deferred parameter today.
        let deferred: Vec<_> = Registry::global()
            .specs()
            .iter()
            .filter(|spec| spec.default.is_auto())
            .map(|spec| spec.name)
            .collect();
        assert_eq!(deferred, vec![N_THREADS]);
    }

    #[test]
    fn informational_flags_mark_the_expected_entries() {
        let registry = Registry::global();
        assert!(registry.lookup("token_timestamps").expect("spec").experimental);
        assert!(registry.lookup("speed_up").expect("spec").experimental);
        assert!(registry.lookup("no_speech_thold").expect("spec").not_implemented);
    }
}
