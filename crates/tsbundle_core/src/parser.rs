use log::{debug, trace};
use oxc_allocator::Allocator;
use oxc_ast::ast::*;
use oxc_ast_visit::{Visit, walk};
use oxc_parser::{Parser as OxcParser, ParserReturn};
use oxc_span::SourceType;
use std::path::Path;

use crate::{
    error::{BundleError, Result},
    types::{COMPUTED_REQUEST, SpecKind, Specifier},
};

/// Lists the import requests of one module in source order.
///
/// Static declarations (`import`, side-effect imports, `export ... from` and
/// TypeScript `import x = require(...)`) are reported as [`SpecKind::Static`].
/// `import()` and `require()` calls anywhere in the tree are reported with
/// their own kinds so the caller can apply its policy. Type-only declarations
/// are dropped since they vanish at runtime.
pub fn parse_specifiers(file: &Path, src: &str) -> Result<Vec<Specifier>> {
    trace!("Parsing file for imports: {}", file.display());
    let st = source_type_for(file);
    let allocator = Allocator::default();
    let ParserReturn { program, errors, panicked, .. } =
        OxcParser::new(&allocator, src, st).parse();

    if panicked || !errors.is_empty() {
        let message = errors
            .first()
            .map(|e| e.to_string())
            .unwrap_or_else(|| "unrecoverable syntax error".to_string());
        return Err(BundleError::Parse { path: file.to_path_buf(), message });
    }

    let mut specs: Vec<Specifier> = Vec::new();
    for stmt in &program.body {
        match stmt {
            Statement::ImportDeclaration(decl) => {
                if decl.import_kind.is_type() {
                    trace!("Skipping type-only import declaration in {}", file.display());
                    continue;
                }

                // `import { type Foo } from 'bar'` is erased entirely; one
                // runtime binding keeps the declaration.
                let has_runtime_import = match &decl.specifiers {
                    Some(specifiers) if !specifiers.is_empty() => {
                        specifiers.iter().any(|spec| match spec {
                            ImportDeclarationSpecifier::ImportSpecifier(s) => {
                                !s.import_kind.is_type()
                            }
                            ImportDeclarationSpecifier::ImportDefaultSpecifier(_) => true,
                            ImportDeclarationSpecifier::ImportNamespaceSpecifier(_) => true,
                        })
                    }
                    _ => true,
                };

                if has_runtime_import {
                    trace!("Found static import: '{}' in {}", decl.source.value, file.display());
                    specs.push(Specifier::new(decl.source.value.as_str(), SpecKind::Static));
                }
                continue;
            }
            Statement::ExportNamedDeclaration(decl) => {
                if let Some(source) = &decl.source
                    && !decl.export_kind.is_type()
                {
                    trace!("Found re-export: '{}' in {}", source.value, file.display());
                    specs.push(Specifier::new(source.value.as_str(), SpecKind::Static));
                }
            }
            Statement::ExportAllDeclaration(decl) => {
                if !decl.export_kind.is_type() {
                    trace!("Found re-export: '{}' in {}", decl.source.value, file.display());
                    specs.push(Specifier::new(decl.source.value.as_str(), SpecKind::Static));
                }
                continue;
            }
            Statement::TSImportEqualsDeclaration(decl) => {
                if let TSModuleReference::ExternalModuleReference(reference) = &decl.module_reference
                {
                    if decl.import_kind.is_type() {
                        trace!("Skipping type-only import-equals in {}", file.display());
                    } else {
                        trace!(
                            "Found import-equals require: '{}' in {}",
                            reference.expression.value,
                            file.display()
                        );
                        specs.push(Specifier::new(
                            reference.expression.value.as_str(),
                            SpecKind::Static,
                        ));
                    }
                }
                continue;
            }
            _ => {}
        }

        DynamicImports { specs: &mut specs }.visit_statement(stmt);
    }

    debug!("Found {} import specifiers in {}", specs.len(), file.display());
    Ok(specs)
}

/// Collects `import()` and `require()` calls from every node it visits.
struct DynamicImports<'s> {
    specs: &'s mut Vec<Specifier>,
}

impl<'a> Visit<'a> for DynamicImports<'_> {
    fn visit_import_expression(&mut self, it: &ImportExpression<'a>) {
        let request = match &it.source {
            Expression::StringLiteral(sl) => sl.value.to_string(),
            _ => COMPUTED_REQUEST.to_string(),
        };
        trace!("Found dynamic import(): '{}'", request);
        self.specs.push(Specifier::new(request, SpecKind::Dynamic));
        walk::walk_import_expression(self, it);
    }

    fn visit_call_expression(&mut self, it: &CallExpression<'a>) {
        if let Expression::Identifier(callee) = &it.callee
            && callee.name.as_str() == "require"
            && let Some(first) = it.arguments.first()
        {
            let request = match first.as_expression() {
                Some(Expression::StringLiteral(sl)) => sl.value.to_string(),
                _ => COMPUTED_REQUEST.to_string(),
            };
            trace!("Found require() call: '{}'", request);
            self.specs.push(Specifier::new(request, SpecKind::Require));
        }
        walk::walk_call_expression(self, it);
    }
}

fn source_type_for(path: &Path) -> SourceType {
    let ext = path.extension().and_then(|e| e.to_str());

    SourceType::default()
        .with_jsx(matches!(ext, Some("tsx") | Some("jsx")))
        .with_typescript(matches!(ext, Some("ts") | Some("tsx") | Some("mts") | Some("cts")))
        // Import declarations only parse in module code
        .with_module(!matches!(ext, Some("cjs") | Some("cts")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn parse(name: &str, src: &str) -> Vec<Specifier> {
        parse_specifiers(&PathBuf::from("/project/src").join(name), src).unwrap()
    }

    fn requests(specs: &[Specifier]) -> Vec<&str> {
        specs.iter().map(|s| s.request.as_str()).collect()
    }

    #[test]
    fn test_static_import_forms() {
        let specs = parse(
            "test.ts",
            "import foo from './foo';\nimport { bar } from './bar';\nimport * as ns from './ns';\nimport './side-effect';",
        );
        assert_eq!(requests(&specs), vec!["./foo", "./bar", "./ns", "./side-effect"]);
        assert!(specs.iter().all(|s| s.kind == SpecKind::Static));
    }

    #[test]
    fn test_source_order_is_preserved() {
        let specs = parse("test.ts", "import './c';\nconst x = 1;\nimport './a';\nimport './b';");
        assert_eq!(requests(&specs), vec!["./c", "./a", "./b"]);
    }

    #[test]
    fn test_reexports_are_static_imports() {
        let specs = parse(
            "test.ts",
            "export { a } from './a';\nexport * from './b';\nexport * as c from './c';\nexport const d = 1;",
        );
        assert_eq!(requests(&specs), vec!["./a", "./b", "./c"]);
        assert!(specs.iter().all(|s| s.kind == SpecKind::Static));
    }

    #[test]
    fn test_type_only_import_skipped() {
        let specs = parse("test.ts", "import type { Foo } from './types';\nexport type { Bar } from './bar';");
        assert!(specs.is_empty());
    }

    #[test]
    fn test_all_inline_type_specifiers_skipped() {
        let specs = parse("test.ts", "import { type Foo, type Bar } from './types';");
        assert!(specs.is_empty());
    }

    #[test]
    fn test_mixed_type_and_runtime_import() {
        let specs = parse("test.ts", "import { type Foo, bar } from './utils';");
        assert_eq!(requests(&specs), vec!["./utils"]);
    }

    #[test]
    fn test_dynamic_import_reported_as_dynamic() {
        let specs = parse("test.ts", "import('./lazy');\nconst m = await import('./other');");
        assert_eq!(requests(&specs), vec!["./lazy", "./other"]);
        assert!(specs.iter().all(|s| s.kind == SpecKind::Dynamic));
    }

    #[test]
    fn test_computed_dynamic_import() {
        let specs = parse("test.ts", "const name = './x';\nimport(name);");
        assert_eq!(specs, vec![Specifier::new(COMPUTED_REQUEST, SpecKind::Dynamic)]);
    }

    #[test]
    fn test_dynamic_import_inside_function_body() {
        let specs = parse(
            "test.ts",
            "export function load() {\n  if (ready) {\n    return import('./later');\n  }\n}\nfunction other() { const fs = require('fs'); }",
        );
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0], Specifier::new("./later", SpecKind::Dynamic));
        assert_eq!(specs[1], Specifier::new("fs", SpecKind::Require));
    }

    #[test]
    fn test_dynamic_import_in_try_and_loops() {
        let specs = parse(
            "test.ts",
            "try { await import('./optional'); } catch {}\nfor (const x of [1]) { import('./a'); }\nwhile (more) { require('./b'); }\nswitch (mode) { case 1: import('./c'); }",
        );
        assert_eq!(requests(&specs), vec!["./optional", "./a", "./b", "./c"]);
    }

    #[test]
    fn test_dynamic_import_in_class_and_default_export() {
        let specs = parse(
            "test.ts",
            "class Loader { load() { return import('./a'); } }\nexport default () => import('./b');",
        );
        assert_eq!(specs.len(), 2);
        assert!(specs.iter().all(|s| s.kind == SpecKind::Dynamic));
        assert_eq!(requests(&specs), vec!["./a", "./b"]);
    }

    #[test]
    fn test_dynamic_import_after_static_in_same_declaration() {
        let specs = parse("test.ts", "export { a } from './a';\nexport const b = () => import('./b');");
        assert_eq!(specs[0], Specifier::new("./a", SpecKind::Static));
        assert_eq!(specs[1], Specifier::new("./b", SpecKind::Dynamic));
    }

    #[test]
    fn test_import_equals_require_is_static() {
        let specs = parse("test.ts", "import b = require('./b');\nimport type T = require('./types');");
        assert_eq!(specs, vec![Specifier::new("./b", SpecKind::Static)]);
    }

    #[test]
    fn test_require_call() {
        let specs = parse("test.js", "const config = loadConfig(require('./config'));");
        assert_eq!(specs, vec![Specifier::new("./config", SpecKind::Require)]);
    }

    #[test]
    fn test_require_in_conditional() {
        let specs = parse("test.js", "const mod = condition ? require('./a') : require('./b');");
        assert_eq!(requests(&specs), vec!["./a", "./b"]);
    }

    #[test]
    fn test_no_imports() {
        assert!(parse("test.ts", "const x: number = 42;").is_empty());
    }

    #[test]
    fn test_tsx_file() {
        let specs = parse(
            "test.tsx",
            "import { Button } from './button';\nexport const App = () => <Button />;",
        );
        assert_eq!(requests(&specs), vec!["./button"]);
    }

    #[test]
    fn test_syntax_error_is_parse_error() {
        let err = parse_specifiers(Path::new("/project/src/bad.ts"), "import { from './x';")
            .unwrap_err();
        match err {
            BundleError::Parse { path, .. } => assert_eq!(path, Path::new("/project/src/bad.ts")),
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
