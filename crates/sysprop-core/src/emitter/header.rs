//! Declarations artifact

use super::{cpp_namespace, enum_type_name, value_type, SourceWriter, GENERATED_BANNER};
use crate::{Property, Schema};

/// Generate the header, declaring every property accepted by `include`.
pub(super) fn generate(schema: &Schema, include: impl Fn(&Property) -> bool) -> String {
    let guard = format!("SYSPROPGEN_{}_H_", schema.module.replace('.', "_"));
    let namespace = cpp_namespace(schema);
    let mut w = SourceWriter::default();

    w.line(GENERATED_BANNER);
    w.blank();
    w.line(&format!("#ifndef {}", guard));
    w.line(&format!("#define {}", guard));
    w.blank();
    w.line("#include <cstdint>");
    w.line("#include <optional>");
    w.line("#include <string>");
    w.line("#include <vector>");
    w.blank();
    w.line(&format!("namespace {} {{", namespace));
    w.blank();

    for prop in schema.props.iter().filter(|p| include(p)) {
        declare_property(&mut w, prop);
    }

    w.line(&format!("}}  // namespace {}", namespace));
    w.blank();
    w.line(&format!("#endif  // {}", guard));
    w.finish()
}

fn declare_property(w: &mut SourceWriter, prop: &Property) {
    let desc = prop.descriptor();
    let ident = prop.identifier();
    let value = value_type(&desc, prop);

    if !desc.symbols.is_empty() {
        w.line(&format!("enum class {} {{", enum_type_name(prop)));
        for symbol in &desc.symbols {
            w.line(&format!("    {},", symbol));
        }
        w.line("};");
        w.blank();
    }

    w.line(&format!("std::optional<{}> {}();", value, ident));
    w.line(&format!("bool {}(const {}& value);", ident, value));
    w.blank();
}
