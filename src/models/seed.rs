//! Sample categories and snippets used when no snapshot has been saved yet.

use chrono::{DateTime, Utc};

use crate::models::{Category, Snippet, SnippetLanguage};

pub fn default_categories() -> Vec<Category> {
    vec![
        Category::new("1", "JavaScript", "hsl(45, 93%, 47%)"),
        Category::new("2", "React", "hsl(193, 95%, 68%)"),
        Category::new("3", "CSS", "hsl(218, 79%, 51%)"),
        Category::new("4", "Python", "hsl(53, 94%, 49%)"),
        Category::new("5", "Utilities", "hsl(262, 83%, 58%)"),
    ]
}

pub fn default_snippets(now: DateTime<Utc>) -> Vec<Snippet> {
    vec![
        seed(
            "1",
            "React useState Hook",
            "Basic useState hook example with counter",
            USE_STATE,
            SnippetLanguage::JavaScript,
            &["react", "hooks", "state"],
            "React",
            true,
            now,
        ),
        seed(
            "2",
            "CSS Flexbox Center",
            "Perfect centering with flexbox",
            FLEX_CENTER,
            SnippetLanguage::CSS,
            &["css", "flexbox", "center"],
            "CSS",
            false,
            now,
        ),
        seed(
            "3",
            "Async Fetch Helper",
            "Reusable async function for API calls",
            FETCH_HELPER,
            SnippetLanguage::JavaScript,
            &["javascript", "async", "fetch", "api"],
            "JavaScript",
            true,
            now,
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn seed(
    id: &str,
    title: &str,
    description: &str,
    code: &str,
    language: SnippetLanguage,
    tags: &[&str],
    category: &str,
    is_favorite: bool,
    now: DateTime<Utc>,
) -> Snippet {
    Snippet {
        id: id.to_string(),
        title: title.to_string(),
        description: Some(description.to_string()),
        code: code.to_string(),
        language,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        category: category.to_string(),
        created_at: now,
        updated_at: now,
        is_favorite,
    }
}

const USE_STATE: &str = r#"import { useState } from 'react';

const Counter = () => {
  const [count, setCount] = useState(0);

  return (
    <div>
      <p>Count: {count}</p>
      <button onClick={() => setCount(count + 1)}>
        Increment
      </button>
    </div>
  );
};

export default Counter;"#;

const FLEX_CENTER: &str = r#".center-container {
  display: flex;
  justify-content: center;
  align-items: center;
  min-height: 100vh;
}"#;

const FETCH_HELPER: &str = r#"const fetchData = async (url, options = {}) => {
  try {
    const response = await fetch(url, {
      headers: {
        'Content-Type': 'application/json',
        ...options.headers,
      },
      ...options,
    });

    if (!response.ok) {
      throw new Error(`HTTP error! status: ${response.status}`);
    }

    return await response.json();
  } catch (error) {
    console.error('Fetch error:', error);
    throw error;
  }
};"#;
