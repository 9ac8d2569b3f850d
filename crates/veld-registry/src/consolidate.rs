//! Module-close consolidation.
//!
//! Runs once per compilation, after every clause has been validated and
//! stored. Reconstructs the final declaration set from the unordered
//! entry map: classification by kind, macro signature mangling, sorted
//! def/defmacro sets, private-definition metadata, and the ordered
//! declaration stream with source-pin markers grouped first.
//!
//! Consolidation does not validate; every check already ran at define
//! time.

use rustc_hash::FxHashSet;

use veld_core::{DefKind, Loc, Signature, macro_signature};

use crate::clause::Clause;
use crate::store::{DefinitionStore, Entry};

/// An emittable declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    /// Signature to emit under; already mangled for public macros.
    pub signature: Signature,
    /// Line the declaration is attributed to.
    pub line: u32,
    /// Clauses in arrival order. Empty for synthesized default variants,
    /// whose bodies come from the default expander at emission time.
    pub clauses: Vec<Clause>,
    /// Whether this is a synthesized reduced-arity default variant.
    pub default_variant: bool,
}

/// One item of the ordered declaration stream.
#[derive(Debug, Clone, PartialEq)]
pub enum DeclItem {
    /// Synthetic marker re-attributing the following declaration.
    SourcePin { file: String, line: u32 },
    /// A function or macro declaration.
    Def(Declaration),
}

/// Metadata recorded for a private definition.
#[derive(Debug, Clone, PartialEq)]
pub struct PrivateDef {
    pub signature: Signature,
    pub kind: DefKind,
    pub line: u32,
    pub check: bool,
    pub defaults: u32,
}

/// The consolidated output of one module compilation.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Consolidation {
    /// Every signature with at least one clause, in discovery order.
    pub signatures: Vec<Signature>,
    /// Exported signatures: public functions as-is, public macros mangled.
    pub exported: Vec<Signature>,
    /// Private definition metadata; never exported.
    pub private: Vec<PrivateDef>,
    /// Sorted, duplicate-free public function signatures.
    pub def_set: Vec<Signature>,
    /// Sorted, duplicate-free public macro signatures (original, unmangled).
    pub defmacro_set: Vec<Signature>,
    /// The final ordered declaration stream: the pinned group (each
    /// declaration preceded by its source-pin marker) followed by the
    /// non-pinned group, both in discovery order.
    pub declarations: Vec<DeclItem>,
}

impl DefinitionStore {
    /// Consolidate the store into the final declaration set.
    ///
    /// Consumes the store; entries whose clause list is empty are skipped
    /// from every output set.
    pub fn consolidate(self) -> Consolidation {
        let DefinitionStore {
            entries,
            mut clauses,
            ..
        } = self;

        let mut ordered: Vec<(Signature, Entry)> = entries.into_iter().collect();
        ordered.sort_by_key(|(_, entry)| entry.index);
        let defined: FxHashSet<Signature> =
            ordered.iter().map(|(sig, _)| sig.clone()).collect();

        let mut out = Consolidation::default();
        let mut pinned = Vec::new();
        let mut plain = Vec::new();

        for (signature, entry) in ordered {
            let entry_clauses = clauses.remove(&signature).unwrap_or_default();
            if entry_clauses.is_empty() {
                continue;
            }
            out.signatures.push(signature.clone());
            let has_body = entry_clauses.iter().any(Clause::has_body);

            let declared = match entry.kind {
                DefKind::Function => {
                    out.exported.push(signature.clone());
                    out.def_set.push(signature.clone());
                    Some(signature.clone())
                }
                DefKind::Macro => {
                    let mangled = macro_signature(&signature);
                    out.exported.push(mangled.clone());
                    out.defmacro_set.push(signature.clone());
                    Some(mangled)
                }
                DefKind::PrivateFunction => {
                    out.private.push(private_def(&signature, &entry));
                    has_body.then(|| signature.clone())
                }
                DefKind::PrivateMacro => {
                    out.private.push(private_def(&signature, &entry));
                    None
                }
            };

            let Some(decl_sig) = declared else { continue };
            let target = if entry.pin.is_some() {
                &mut pinned
            } else {
                &mut plain
            };
            if let Some(Loc { file, line }) = entry.pin.clone() {
                target.push(DeclItem::SourcePin { file, line });
            }
            target.push(DeclItem::Def(Declaration {
                signature: decl_sig.clone(),
                line: entry.first_line,
                clauses: entry_clauses,
                default_variant: false,
            }));

            let variant_line = entry.defaults_line.unwrap_or(entry.first_line);
            for stripped in 1..=entry.defaults.max {
                // An explicitly registered entry at the reduced arity
                // declares on its own; synthesizing here would emit the
                // same signature twice.
                let reduced = signature.arity.saturating_sub(stripped);
                if defined.contains(&signature.with_arity(reduced)) {
                    continue;
                }
                target.push(DeclItem::Def(Declaration {
                    signature: decl_sig.with_arity(decl_sig.arity.saturating_sub(stripped)),
                    line: variant_line,
                    clauses: Vec::new(),
                    default_variant: true,
                }));
            }
        }

        out.def_set.sort();
        out.def_set.dedup();
        out.defmacro_set.sort();
        out.defmacro_set.dedup();

        out.declarations = pinned;
        out.declarations.extend(plain);
        out
    }
}

fn private_def(signature: &Signature, entry: &Entry) -> PrivateDef {
    PrivateDef {
        signature: signature.clone(),
        kind: entry.kind,
        line: entry.first_line,
        check: entry.check,
        defaults: entry.defaults.max,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause::{ArgPattern, UnpackedDefinition};
    use veld_core::Diagnostics;

    fn var(name: &str) -> ArgPattern {
        ArgPattern::Var(name.into())
    }

    fn defaulted(name: &str) -> ArgPattern {
        ArgPattern::VarDefault(name.into())
    }

    fn store_with(defs: &[(DefKind, &str, Clause)]) -> DefinitionStore {
        let mut store = DefinitionStore::new();
        let mut diags = Diagnostics::new();
        for (kind, name, clause) in defs {
            store
                .store_definition(
                    &mut diags,
                    *kind,
                    true,
                    "lib.veld",
                    None,
                    name,
                    UnpackedDefinition::new(clause.clone()),
                )
                .unwrap();
        }
        store
    }

    fn defs_of(out: &Consolidation) -> Vec<&Declaration> {
        out.declarations
            .iter()
            .filter_map(|item| match item {
                DeclItem::Def(decl) => Some(decl),
                DeclItem::SourcePin { .. } => None,
            })
            .collect()
    }

    #[test]
    fn classifies_every_kind() {
        let out = store_with(&[
            (DefKind::Function, "pub_fn", Clause::new(1, vec![], "a")),
            (
                DefKind::PrivateFunction,
                "priv_fn",
                Clause::new(2, vec![], "b"),
            ),
            (
                DefKind::Macro,
                "pub_macro",
                Clause::new(3, vec![var("x")], "c"),
            ),
            (
                DefKind::PrivateMacro,
                "priv_macro",
                Clause::new(4, vec![], "d"),
            ),
        ])
        .consolidate();

        assert_eq!(out.signatures.len(), 4);
        assert_eq!(
            out.exported,
            vec![
                Signature::new("pub_fn", 0),
                Signature::new("MACRO-pub_macro", 2),
            ]
        );
        assert_eq!(out.def_set, vec![Signature::new("pub_fn", 0)]);
        assert_eq!(out.defmacro_set, vec![Signature::new("pub_macro", 1)]);
        assert_eq!(out.private.len(), 2);

        // Private macro never declares; the other three do.
        let decls = defs_of(&out);
        assert_eq!(decls.len(), 3);
        assert!(
            decls
                .iter()
                .all(|d| d.signature.name != "priv_macro")
        );
    }

    #[test]
    fn exported_and_private_are_disjoint_and_exhaustive() {
        let out = store_with(&[
            (DefKind::Function, "a", Clause::new(1, vec![], "x")),
            (DefKind::PrivateFunction, "b", Clause::new(2, vec![], "y")),
            (DefKind::Macro, "c", Clause::new(3, vec![], "z")),
            (DefKind::PrivateMacro, "d", Clause::new(4, vec![], "w")),
        ])
        .consolidate();

        for sig in &out.signatures {
            let exported = out
                .exported
                .iter()
                .any(|e| e == sig || e.name == format!("MACRO-{}", sig.name));
            let private = out.private.iter().any(|p| &p.signature == sig);
            assert!(exported ^ private, "{} must be exported xor private", sig);
        }
    }

    #[test]
    fn bodyless_private_function_gets_no_declaration() {
        let mut store = DefinitionStore::new();
        let mut diags = Diagnostics::new();
        // A head with defaults is a legitimate first clause.
        store
            .store_definition(
                &mut diags,
                DefKind::PrivateFunction,
                true,
                "lib.veld",
                None,
                "helper",
                UnpackedDefinition::new(Clause::head(2, vec![var("a"), defaulted("b")])),
            )
            .unwrap();

        let out = store.consolidate();
        assert_eq!(out.private.len(), 1);
        assert_eq!(out.private[0].defaults, 1);
        assert!(defs_of(&out).is_empty());
    }

    #[test]
    fn deleted_entries_are_absent_from_output() {
        let mut store = store_with(&[
            (DefKind::Function, "keep", Clause::new(1, vec![], "a")),
            (DefKind::Function, "drop", Clause::new(2, vec![], "b")),
        ]);
        store.delete(&Signature::new("drop", 0));

        let out = store.consolidate();
        assert_eq!(out.signatures, vec![Signature::new("keep", 0)]);
        assert_eq!(out.exported, vec![Signature::new("keep", 0)]);
    }

    #[test]
    fn def_sets_are_sorted_and_deduplicated() {
        let out = store_with(&[
            (DefKind::Function, "zeta", Clause::new(1, vec![], "a")),
            (
                DefKind::Function,
                "alpha",
                Clause::new(2, vec![var("x")], "b"),
            ),
            (DefKind::Function, "alpha", Clause::new(3, vec![], "c")),
        ])
        .consolidate();

        assert_eq!(
            out.def_set,
            vec![
                Signature::new("alpha", 0),
                Signature::new("alpha", 1),
                Signature::new("zeta", 0),
            ]
        );
    }

    #[test]
    fn pinned_declarations_come_first_with_their_markers() {
        let mut store = DefinitionStore::new();
        let mut diags = Diagnostics::new();

        store
            .store_definition(
                &mut diags,
                DefKind::Function,
                true,
                "lib.veld",
                None,
                "plain",
                UnpackedDefinition::new(Clause::new(1, vec![], "a")),
            )
            .unwrap();
        store
            .store_definition(
                &mut diags,
                DefKind::Function,
                true,
                "lib.veld",
                Some(Loc::new("gen.veld", 50)),
                "pinned",
                UnpackedDefinition::new(Clause::new(2, vec![], "b")),
            )
            .unwrap();

        let out = store.consolidate();
        assert_eq!(out.declarations.len(), 3);
        assert_eq!(
            out.declarations[0],
            DeclItem::SourcePin {
                file: "gen.veld".into(),
                line: 50
            }
        );
        match &out.declarations[1] {
            DeclItem::Def(decl) => assert_eq!(decl.signature, Signature::new("pinned", 0)),
            other => panic!("expected pinned declaration, got {:?}", other),
        }
        match &out.declarations[2] {
            DeclItem::Def(decl) => assert_eq!(decl.signature, Signature::new("plain", 0)),
            other => panic!("expected plain declaration, got {:?}", other),
        }
    }

    #[test]
    fn default_variants_are_synthesized_at_reduced_arities() {
        let mut store = DefinitionStore::new();
        let mut diags = Diagnostics::new();
        store
            .store_definition(
                &mut diags,
                DefKind::Function,
                true,
                "lib.veld",
                None,
                "fetch",
                UnpackedDefinition::new(Clause::new(
                    7,
                    vec![var("a"), defaulted("b"), defaulted("c")],
                    "body",
                )),
            )
            .unwrap();

        let out = store.consolidate();
        let decls = defs_of(&out);
        assert_eq!(decls.len(), 3);
        assert_eq!(decls[0].signature, Signature::new("fetch", 3));
        assert!(!decls[0].default_variant);
        assert_eq!(decls[1].signature, Signature::new("fetch", 2));
        assert!(decls[1].default_variant);
        assert_eq!(decls[2].signature, Signature::new("fetch", 1));
        assert_eq!(decls[1].line, 7);
    }

    #[test]
    fn explicit_variant_entries_suppress_synthesized_declarations() {
        let mut store = DefinitionStore::new();
        let mut diags = Diagnostics::new();

        // The default expander hands over the primary plus a concrete
        // reduced-arity clause; that clause lands as its own entry.
        let unpacked = UnpackedDefinition::new(Clause::new(
            5,
            vec![var("a"), defaulted("b")],
            "body",
        ))
        .with_variant(Clause::new(5, vec![var("a")], "fetch(a, nil)"), 0);
        store
            .store_definition(
                &mut diags,
                DefKind::Function,
                true,
                "lib.veld",
                None,
                "fetch",
                unpacked,
            )
            .unwrap();

        let out = store.consolidate();
        let decls = defs_of(&out);
        let at_one: Vec<_> = decls
            .iter()
            .filter(|d| d.signature == Signature::new("fetch", 1))
            .collect();
        assert_eq!(at_one.len(), 1);
        // The registered clause wins over an empty synthesized declaration.
        assert!(!at_one[0].default_variant);
        assert_eq!(at_one[0].clauses.len(), 1);
    }

    #[test]
    fn pinned_entries_keep_their_relative_order() {
        let mut store = DefinitionStore::new();
        let mut diags = Diagnostics::new();

        for (name, pin, line) in [
            ("plain_a", None, 1),
            ("gen_a", Some(Loc::new("gen.veld", 10)), 2),
            ("plain_b", None, 3),
            ("gen_b", Some(Loc::new("gen.veld", 20)), 4),
        ] {
            store
                .store_definition(
                    &mut diags,
                    DefKind::Function,
                    true,
                    "lib.veld",
                    pin,
                    name,
                    UnpackedDefinition::new(Clause::new(line, vec![], "x")),
                )
                .unwrap();
        }

        let out = store.consolidate();
        // Markers and pinned declarations first, in discovery order, then
        // the plain declarations in discovery order.
        assert_eq!(
            out.declarations[0],
            DeclItem::SourcePin {
                file: "gen.veld".into(),
                line: 10
            }
        );
        assert_eq!(
            out.declarations[2],
            DeclItem::SourcePin {
                file: "gen.veld".into(),
                line: 20
            }
        );
        let names: Vec<&str> = defs_of(&out)
            .iter()
            .map(|d| d.signature.name.as_str())
            .collect();
        assert_eq!(names, vec!["gen_a", "gen_b", "plain_a", "plain_b"]);
    }

    #[test]
    fn macro_variants_reduce_from_the_mangled_arity() {
        let mut store = DefinitionStore::new();
        let mut diags = Diagnostics::new();
        store
            .store_definition(
                &mut diags,
                DefKind::Macro,
                true,
                "lib.veld",
                None,
                "wrap",
                UnpackedDefinition::new(Clause::new(3, vec![var("a"), defaulted("b")], "body")),
            )
            .unwrap();

        let out = store.consolidate();
        let decls = defs_of(&out);
        // Mangled wrap/2 -> MACRO-wrap/3, variant at arity 2.
        assert_eq!(decls[0].signature, Signature::new("MACRO-wrap", 3));
        assert_eq!(decls[1].signature, Signature::new("MACRO-wrap", 2));
    }
}
