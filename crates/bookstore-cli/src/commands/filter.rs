//! Filter commands.
//!
//! `bookstore filter explain` - Show how a listing query compiles.

use anyhow::Context;
use bookstore_core::PaginationConfig;
use bookstore_filter::{CompiledPredicate, FilterSchema, PageRequest, SqlParam, compile};
use url::form_urlencoded;

/// Decode a raw query string (`a=1&b=Homo+Deus`) into pairs, the way the
/// server's query extractor does.
fn query_pairs(query: &str) -> Vec<(String, String)> {
    form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
        .into_owned()
        .collect()
}

/// Compile a listing query for a resource.
pub fn compile_query(
    resource: &str,
    query: &str,
) -> anyhow::Result<(CompiledPredicate, PageRequest)> {
    let schema = FilterSchema::for_resource(resource).with_context(|| {
        format!(
            "Unknown resource '{}'. Expected one of: books, authors, customers, users",
            resource
        )
    })?;

    let pairs = query_pairs(query);
    let params = || pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()));
    let spec = schema.spec_from_query(params())?;
    let page = PageRequest::from_query(params(), PaginationConfig::default())?;
    Ok((compile(schema, &spec), page))
}

/// Print the compiled predicate, its SQL rendering and the page request.
pub fn explain(resource: &str, query: &str) -> anyhow::Result<()> {
    let (predicate, page) = compile_query(resource, query)?;
    let sql = predicate.to_sql(1);

    println!("Resource:  {}", resource);
    println!("Predicate: {}", predicate);
    println!("SQL:       WHERE {}", sql.clause);
    for (i, param) in sql.params.iter().enumerate() {
        let rendered = match param {
            SqlParam::Value(value) => value.to_string(),
            SqlParam::Array(values) => {
                let values: Vec<String> = values.iter().map(ToString::to_string).collect();
                format!("[{}]", values.join(", "))
            }
        };
        println!("  ${} = {}", i + 1, rendered);
    }
    println!(
        "Page:      {} (size {}, offset {})",
        page.page,
        page.size,
        page.offset()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_query_pairs() {
        assert_eq!(
            query_pairs("?title=Sapiens&flag&&size=5"),
            owned(&[("title", "Sapiens"), ("flag", ""), ("size", "5")])
        );
        assert!(query_pairs("").is_empty());
    }

    #[test]
    fn test_query_pairs_are_percent_decoded() {
        assert_eq!(
            query_pairs("title=Homo%20Deus&isbn=978%2D0&name=Homo+Deus"),
            owned(&[
                ("title", "Homo Deus"),
                ("isbn", "978-0"),
                ("name", "Homo Deus")
            ])
        );
    }

    #[test]
    fn test_encoded_title_compiles_like_the_server() {
        for query in ["title=Homo%20Deus", "title=Homo+Deus"] {
            let (predicate, _) = compile_query("books", query).unwrap();
            assert_eq!(predicate.to_string(), "title contains \"homo deus\"");
        }
    }

    #[test]
    fn test_compile_books_query() {
        let (predicate, page) =
            compile_query("books", "title=Sapiens&isAvailableOnline=true&size=10").unwrap();

        assert_eq!(predicate.conditions().len(), 2);
        assert_eq!(
            predicate.to_string(),
            "title contains \"sapiens\" and isAvailableOnline = true"
        );
        assert_eq!(page, PageRequest { page: 0, size: 10 });
    }

    #[test]
    fn test_empty_query_is_always() {
        let (predicate, _) = compile_query("authors", "").unwrap();
        assert!(predicate.is_always());
    }

    #[test]
    fn test_unknown_resource() {
        assert!(compile_query("carts", "").is_err());
        assert!(explain("books", "isAvailableOnline=perhaps").is_err());
    }
}
