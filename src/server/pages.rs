//! HTML rendering for the search front-end. Untrusted strings (queries,
//! stored titles and snippets, URLs) are escaped at render time.

use crate::store::SearchResult;

/// Minimal HTML entity escaping for text nodes and attribute values.
pub fn html_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// The landing page: a search form, pre-filled when a query was supplied.
pub fn search_page(query: &str) -> String {
    let query = html_escape(query);
    format!(
        "<!DOCTYPE html>\
        <html>\
        <head>\
        <title>Search Engine</title>\
        <meta charset='UTF-8'>\
        <meta name='viewport' content='width=device-width, initial-scale=1.0'>\
        <style>\
        body {{ font-family: Arial, sans-serif; margin: 40px; background-color: #f5f5f5; }}\
        .container {{ max-width: 800px; margin: 0 auto; background: white; padding: 30px; border-radius: 8px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }}\
        .search-box {{ text-align: center; margin-bottom: 30px; }}\
        h1 {{ color: #4285f4; margin-bottom: 30px; }}\
        input[type=text] {{ width: 70%; padding: 12px; font-size: 16px; border: 1px solid #ddd; border-radius: 24px; outline: none; }}\
        input[type=text]:focus {{ border-color: #4285f4; box-shadow: 0 0 5px rgba(66, 133, 244, 0.3); }}\
        input[type=submit] {{ padding: 12px 24px; font-size: 16px; background-color: #4285f4; color: white; border: none; border-radius: 24px; cursor: pointer; margin-left: 10px; }}\
        input[type=submit]:hover {{ background-color: #3367d6; }}\
        .footer {{ text-align: center; margin-top: 40px; color: #666; font-size: 14px; }}\
        </style>\
        </head>\
        <body>\
        <div class='container'>\
        <div class='search-box'>\
        <h1>Search Engine</h1>\
        <form method='post' action='/search'>\
        <input type='text' name='q' value=\"{query}\" placeholder='Enter your search query...'>\
        <input type='submit' value='Search'>\
        </form>\
        </div>\
        <div class='footer'>\
        Built with Rust, axum and PostgreSQL\
        </div>\
        </div>\
        </body>\
        </html>"
    )
}

/// The results page: echoed query, hit count, and one block per result.
pub fn results_page(results: &[SearchResult], query: &str) -> String {
    let query = html_escape(query);

    let mut body = String::new();
    if results.is_empty() {
        body.push_str(
            "<div class='no-results'>\
             <h3>No results found</h3>\
             <p>Try different keywords or check your spelling.</p>\
             </div>",
        );
    } else {
        for result in results {
            let url = html_escape(&result.url);
            let title = if result.title.is_empty() {
                url.clone()
            } else {
                html_escape(&result.title)
            };
            let snippet = html_escape(&result.snippet);
            body.push_str(&format!(
                "<div class='result'>\
                 <a class='result-title' href=\"{url}\" target='_blank'>{title}</a>\
                 <div class='result-url'>{url}</div>\
                 <div class='result-snippet'>{snippet}</div>\
                 <div class='result-relevance'>Relevance score: {relevance}</div>\
                 </div>",
                relevance = result.relevance,
            ));
        }
    }

    format!(
        "<!DOCTYPE html>\
        <html>\
        <head>\
        <title>Search Results for \"{query}\"</title>\
        <meta charset='UTF-8'>\
        <meta name='viewport' content='width=device-width, initial-scale=1.0'>\
        <style>\
        body {{ font-family: Arial, sans-serif; margin: 0; padding: 0; background-color: #f5f5f5; }}\
        .header {{ background: white; padding: 20px; border-bottom: 1px solid #e0e0e0; }}\
        .container {{ max-width: 800px; margin: 0 auto; }}\
        .search-box {{ display: flex; align-items: center; }}\
        h1 {{ color: #4285f4; margin: 0; margin-right: 30px; font-size: 24px; }}\
        input[type=text] {{ flex: 1; padding: 12px; font-size: 16px; border: 1px solid #ddd; border-radius: 24px; outline: none; }}\
        input[type=text]:focus {{ border-color: #4285f4; }}\
        input[type=submit] {{ padding: 12px 24px; font-size: 16px; background-color: #4285f4; color: white; border: none; border-radius: 24px; cursor: pointer; margin-left: 10px; }}\
        .results {{ background: white; margin: 20px auto; max-width: 800px; padding: 20px; border-radius: 8px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }}\
        .result {{ margin-bottom: 25px; padding-bottom: 20px; border-bottom: 1px solid #f0f0f0; }}\
        .result:last-child {{ border-bottom: none; margin-bottom: 0; }}\
        .result-title {{ font-size: 18px; color: #1a0dab; text-decoration: none; font-weight: normal; margin: 0 0 5px 0; display: block; }}\
        .result-title:hover {{ text-decoration: underline; }}\
        .result-url {{ color: #006621; font-size: 14px; margin: 0 0 8px 0; }}\
        .result-snippet {{ color: #545454; font-size: 14px; line-height: 1.4; margin: 0; }}\
        .result-relevance {{ color: #70757a; font-size: 12px; margin-top: 5px; }}\
        .no-results {{ text-align: center; padding: 40px; color: #70757a; }}\
        .results-count {{ color: #70757a; font-size: 14px; margin-bottom: 20px; }}\
        </style>\
        </head>\
        <body>\
        <div class='header'>\
        <div class='container'>\
        <div class='search-box'>\
        <h1>Search Engine</h1>\
        <form method='post' action='/search' style='display: flex; flex: 1;'>\
        <input type='text' name='q' value=\"{query}\">\
        <input type='submit' value='Search'>\
        </form>\
        </div>\
        </div>\
        </div>\
        <div class='results'>\
        <div class='results-count'>Found {count} results for \"{query}\"</div>\
        {body}\
        </div>\
        </body>\
        </html>",
        count = results.len(),
    )
}

/// Error page with a link back to the search form.
pub fn error_page(message: &str) -> String {
    let message = html_escape(message);
    format!(
        "<!DOCTYPE html>\
        <html>\
        <head>\
        <title>Error</title>\
        <meta charset='UTF-8'>\
        <meta name='viewport' content='width=device-width, initial-scale=1.0'>\
        <style>\
        body {{ font-family: Arial, sans-serif; margin: 40px; background-color: #f5f5f5; }}\
        .container {{ max-width: 600px; margin: 0 auto; background: white; padding: 30px; border-radius: 8px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); text-align: center; }}\
        .error {{ color: #d93025; font-size: 18px; margin-bottom: 20px; }}\
        a {{ color: #4285f4; text-decoration: none; }}\
        a:hover {{ text-decoration: underline; }}\
        </style>\
        </head>\
        <body>\
        <div class='container'>\
        <h1>Error</h1>\
        <div class='error'>{message}</div>\
        <p><a href='/'>Back to search</a></p>\
        </div>\
        </body>\
        </html>"
    )
}
