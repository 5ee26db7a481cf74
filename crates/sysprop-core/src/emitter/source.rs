//! Definitions artifact

use super::{cpp_namespace, enum_type_name, value_type, EmitOptions, SourceWriter, GENERATED_BANNER};
use crate::types::ScalarKind;
use crate::{Property, Schema};

/// Scalar parsers, list support, formatters and the store read helper.
///
/// Lists are joined with a comma between consecutive elements.
const COMMON_HELPERS: &str = r##"template <typename T> constexpr bool is_vector = false;

template <typename T> constexpr bool is_vector<std::vector<T>> = true;

template <> [[maybe_unused]] std::optional<bool> DoParse(const char* str) {
    static constexpr const char* kYes[] = {"1", "true"};
    static constexpr const char* kNo[] = {"0", "false"};

    for (const char* yes : kYes) {
        if (strcasecmp(yes, str) == 0) return std::make_optional(true);
    }

    for (const char* no : kNo) {
        if (strcasecmp(no, str) == 0) return std::make_optional(false);
    }

    return std::nullopt;
}

template <> [[maybe_unused]] std::optional<std::int32_t> DoParse(const char* str) {
    std::int32_t ret;
    bool success = android::base::ParseInt(str, &ret);
    return success ? std::make_optional(ret) : std::nullopt;
}

template <> [[maybe_unused]] std::optional<std::int64_t> DoParse(const char* str) {
    std::int64_t ret;
    bool success = android::base::ParseInt(str, &ret);
    return success ? std::make_optional(ret) : std::nullopt;
}

template <> [[maybe_unused]] std::optional<double> DoParse(const char* str) {
    int old_errno = errno;
    errno = 0;
    char* end;
    double ret = std::strtod(str, &end);
    if (errno != 0) {
        return std::nullopt;
    }
    if (str == end || *end != '\0') {
        errno = old_errno;
        return std::nullopt;
    }
    errno = old_errno;
    return std::make_optional(ret);
}

template <> [[maybe_unused]] std::optional<std::string> DoParse(const char* str) {
    return std::make_optional(str);
}

template <typename Vec> [[maybe_unused]] std::optional<Vec> DoParseList(const char* str) {
    Vec ret;
    for (auto&& element : android::base::Split(str, ",")) {
        auto parsed = DoParse<typename Vec::value_type>(element.c_str());
        if (!parsed) {
            return std::nullopt;
        }
        ret.emplace_back(std::move(*parsed));
    }
    return std::make_optional(std::move(ret));
}

template <typename T> inline std::optional<T> TryParse(const char* str) {
    if constexpr(is_vector<T>) {
        return DoParseList<T>(str);
    } else {
        return DoParse<T>(str);
    }
}

[[maybe_unused]] std::string FormatValue(std::int32_t value) {
    return std::to_string(value);
}

[[maybe_unused]] std::string FormatValue(std::int64_t value) {
    return std::to_string(value);
}

[[maybe_unused]] std::string FormatValue(double value) {
    return android::base::StringPrintf("%.*g", std::numeric_limits<double>::max_digits10, value);
}

[[maybe_unused]] std::string FormatValue(bool value) {
    return value ? "true" : "false";
}

template <typename T>
[[maybe_unused]] std::string FormatValue(const std::vector<T>& value) {
    if (value.empty()) return "";

    std::string ret;

    for (auto it = value.begin(); it != value.end(); ++it) {
        if (it != value.begin()) ret.push_back(',');
        const auto& element = *it;
        if constexpr(std::is_same_v<T, std::string>) {
            ret += element;
        } else {
            ret += FormatValue(element);
        }
    }

    return ret;
}

template <typename T>
std::optional<T> GetProp(const char* key) {
    auto pi = __system_property_find(key);
    if (pi == nullptr) return std::nullopt;
    std::optional<T> ret;
    __system_property_read_callback(pi, [](void* cookie, const char*, const char* value, std::uint32_t) {
        *static_cast<std::optional<T>*>(cookie) = TryParse<T>(value);
    }, &ret);
    return ret;
}
"##;

/// Writers for `integer_as_bool` properties
const INTEGER_AS_BOOL_HELPERS: &str = r##"[[maybe_unused]] std::string FormatIntegerAsBool(bool value) {
    return value ? "1" : "0";
}

[[maybe_unused]] std::string FormatIntegerAsBool(const std::vector<bool>& value) {
    std::string ret;

    for (auto it = value.begin(); it != value.end(); ++it) {
        if (it != value.begin()) ret.push_back(',');
        ret += *it ? "1" : "0";
    }

    return ret;
}
"##;

/// Generate the source file for a normalized schema.
pub(super) fn generate(schema: &Schema, options: &EmitOptions) -> String {
    let namespace = cpp_namespace(schema);
    let mut w = SourceWriter::default();

    w.line(GENERATED_BANNER);
    w.blank();
    w.line(&format!("#include <{}>", options.include_name));
    w.blank();
    for include in ["cstring", "iterator", "type_traits", "utility"] {
        w.line(&format!("#include <{}>", include));
    }
    w.blank();
    w.line("#include <strings.h>");
    w.line("#include <sys/system_properties.h>");
    w.blank();
    for include in ["logging", "parseint", "stringprintf", "strings"] {
        w.line(&format!("#include <android-base/{}.h>", include));
    }
    w.blank();

    // ── Internal helpers ───────────────────────────────
    w.line("namespace {");
    w.blank();
    w.line(&format!("using namespace {};", namespace));
    w.blank();
    w.line("template <typename T> std::optional<T> DoParse(const char* str);");
    w.blank();

    for prop in schema.props.iter().filter(|p| p.prop_type.is_enum()) {
        enum_table(&mut w, schema, prop);
    }

    w.raw(COMMON_HELPERS);
    w.blank();
    if schema.props.iter().any(|p| p.integer_as_bool) {
        w.raw(INTEGER_AS_BOOL_HELPERS);
        w.blank();
    }
    w.line("}  // namespace");
    w.blank();

    // ── Public accessors ───────────────────────────────
    w.line(&format!("namespace {} {{", namespace));
    w.blank();
    for prop in &schema.props {
        define_accessors(&mut w, schema, prop);
    }
    w.line(&format!("}}  // namespace {}", namespace));
    w.finish()
}

/// Symbol table plus the enum's parse and format specializations
fn enum_table(w: &mut SourceWriter, schema: &Schema, prop: &Property) {
    let desc = prop.descriptor();
    let enum_type = enum_type_name(prop);
    let table = format!("{}_list", prop.identifier());

    w.line(&format!(
        "constexpr const std::pair<const char*, {}> {}[] = {{",
        enum_type, table
    ));
    for symbol in &desc.symbols {
        w.line(&format!("    {{\"{}\", {}::{}}},", symbol, enum_type, symbol));
    }
    w.line("};");
    w.blank();

    w.line("template <>");
    w.line(&format!("std::optional<{}> DoParse(const char* str) {{", enum_type));
    w.line(&format!("    for (auto [name, val] : {}) {{", table));
    w.line("        if (strcmp(str, name) == 0) {");
    w.line("            return val;");
    w.line("        }");
    w.line("    }");
    w.line("    return std::nullopt;");
    w.line("}");
    w.blank();

    w.line(&format!("std::string FormatValue({} value) {{", enum_type));
    w.line(&format!("    for (auto [name, val] : {}) {{", table));
    w.line("        if (val == value) {");
    w.line("            return name;");
    w.line("        }");
    w.line("    }");
    w.line(&format!(
        "    LOG(FATAL) << \"Invalid value \" << static_cast<std::int32_t>(value) << \" for property \" << \"{}\";",
        prop.store_key(schema.owner)
    ));
    w.line("    __builtin_unreachable();");
    w.line("}");
    w.blank();
}

fn define_accessors(w: &mut SourceWriter, schema: &Schema, prop: &Property) {
    let desc = prop.descriptor();
    let ident = prop.identifier();
    let value = value_type(&desc, prop);
    let key = prop.store_key(schema.owner);

    let encoded = if prop.integer_as_bool {
        "FormatIntegerAsBool(value).c_str()"
    } else {
        match (desc.scalar, desc.is_list) {
            (ScalarKind::String, false) => "value.c_str()",
            _ => "FormatValue(value).c_str()",
        }
    };

    w.line(&format!("std::optional<{}> {}() {{", value, ident));
    w.line(&format!("    return GetProp<{}>(\"{}\");", value, key));
    w.line("}");
    w.blank();
    w.line(&format!("bool {}(const {}& value) {{", ident, value));
    w.line(&format!(
        "    return __system_property_set(\"{}\", {}) == 0;",
        key, encoded
    ));
    w.line("}");
    w.blank();
}
