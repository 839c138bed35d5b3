//! 内置站点脚手架:模拟生成的示例站与解析失败时的兜底站。

use regex::Regex;

/// 站名提取时跳过的虚词。
const STOP_WORDS: &[&str] = &["a", "an", "the", "for", "website", "site", "page"];

const SAMPLE_PACKAGE_JSON: &str = r#"{
  "name": "generated-website",
  "version": "1.0.0",
  "private": true,
  "dependencies": {
    "react": "^18.2.0",
    "react-dom": "^18.2.0",
    "react-scripts": "5.0.1",
    "tailwindcss": "^3.3.0"
  },
  "scripts": {
    "start": "react-scripts start",
    "build": "react-scripts build",
    "test": "react-scripts test",
    "eject": "react-scripts eject"
  }
}"#;

const SAMPLE_APP_JS: &str = r#"import React from 'react';
import './App.css';

function App() {
  return (
    <div className="App">
      <header className="bg-gray-900 text-white">
        <div className="container mx-auto px-4 py-6">
          <h1 className="text-3xl font-bold">Your Generated Website</h1>
          <p className="text-gray-300 mt-2">Built with AI from: "{prompt}"</p>
        </div>
      </header>

      <main className="container mx-auto px-4 py-12">
        <section className="text-center mb-12">
          <h2 className="text-4xl font-bold text-gray-900 mb-4">
            Welcome to Your New Website
          </h2>
          <p className="text-xl text-gray-600 max-w-2xl mx-auto">
            This website was generated based on your requirements and is ready to be customized further.
          </p>
        </section>

        <section className="grid md:grid-cols-3 gap-8">
          <div className="bg-white p-6 rounded-lg shadow-lg">
            <h3 className="text-xl font-semibold mb-3">Feature 1</h3>
            <p className="text-gray-600">Description of the first key feature of your website.</p>
          </div>
          <div className="bg-white p-6 rounded-lg shadow-lg">
            <h3 className="text-xl font-semibold mb-3">Feature 2</h3>
            <p className="text-gray-600">Description of the second key feature of your website.</p>
          </div>
          <div className="bg-white p-6 rounded-lg shadow-lg">
            <h3 className="text-xl font-semibold mb-3">Feature 3</h3>
            <p className="text-gray-600">Description of the third key feature of your website.</p>
          </div>
        </section>
      </main>

      <footer className="bg-gray-900 text-white py-8">
        <div className="container mx-auto px-4 text-center">
          <p>&copy; 2024 Your Generated Website. Built with zsite</p>
        </div>
      </footer>
    </div>
  );
}

export default App;"#;

const SAMPLE_APP_CSS: &str = r##".App {
  text-align: center;
}

body {
  margin: 0;
  font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Roboto', 'Oxygen',
    'Ubuntu', 'Cantarell', 'Fira Sans', 'Droid Sans', 'Helvetica Neue',
    sans-serif;
  -webkit-font-smoothing: antialiased;
  -moz-osx-font-smoothing: grayscale;
  background-color: #f8fafc;
}

.container {
  max-width: 1200px;
}"##;

const SAMPLE_INDEX_JS: &str = r#"import React from 'react';
import ReactDOM from 'react-dom/client';
import './index.css';
import App from './App';

const root = ReactDOM.createRoot(document.getElementById('root'));
root.render(
  <React.StrictMode>
    <App />
  </React.StrictMode>
);"#;

const SAMPLE_INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <link rel="icon" href="%PUBLIC_URL%/favicon.ico" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <meta name="theme-color" content="#000000" />
    <meta name="description" content="Generated website created with zsite" />
    <title>Generated Website</title>
  </head>
  <body>
    <noscript>You need to enable JavaScript to run this app.</noscript>
    <div id="root"></div>
  </body>
</html>"##;

const SAMPLE_README: &str = r#"# Generated Website

This website was generated with the zsite AI builder.

## Getting Started

```bash
npm install
npm start
```

## Deployment

```bash
npm run build
```

Built with zsite"#;

/// 模拟生成的完整示例站,六个文件,提示词写进首页页眉。
pub fn sample_site(prompt: &str) -> Vec<(String, String)> {
    vec![
        ("package.json".to_string(), SAMPLE_PACKAGE_JSON.to_string()),
        (
            "src/App.js".to_string(),
            SAMPLE_APP_JS.replace("{prompt}", prompt),
        ),
        ("src/App.css".to_string(), SAMPLE_APP_CSS.to_string()),
        ("src/index.js".to_string(), SAMPLE_INDEX_JS.to_string()),
        (
            "public/index.html".to_string(),
            SAMPLE_INDEX_HTML.to_string(),
        ),
        ("README.md".to_string(), SAMPLE_README.to_string()),
    ]
}

const FALLBACK_APP_TSX: &str = r#"import React from 'react';

function App() {
  return (
    <div className="min-h-screen bg-gray-900 text-white">
      <header className="bg-gray-800 py-4">
        <div className="container mx-auto px-4">
          <h1 className="text-2xl font-bold">{site_name}</h1>
        </div>
      </header>

      <main className="container mx-auto px-4 py-8">
        <div className="text-center">
          <h2 className="text-4xl font-bold mb-4">Welcome to {site_name}</h2>
          <p className="text-xl text-gray-300 mb-8">
            This website was generated based on your description: "{prompt}"
          </p>
          <button className="bg-blue-600 hover:bg-blue-700 px-6 py-3 rounded-lg font-medium">
            Get Started
          </button>
        </div>
      </main>
    </div>
  );
}

export default App;"#;

const FALLBACK_PACKAGE_JSON: &str = r#"{
  "name": "{package_name}",
  "version": "1.0.0",
  "type": "module",
  "scripts": {
    "dev": "vite",
    "build": "vite build",
    "preview": "vite preview"
  },
  "dependencies": {
    "react": "^18.2.0",
    "react-dom": "^18.2.0"
  },
  "devDependencies": {
    "@vitejs/plugin-react": "^4.0.0",
    "vite": "^4.4.0",
    "tailwindcss": "^3.3.0",
    "autoprefixer": "^10.4.14",
    "postcss": "^8.4.24"
  }
}"#;

const FALLBACK_INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{site_name}</title>
    <script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="bg-gray-900 text-white">
    <div id="root"></div>
    <script type="module" src="/src/main.tsx"></script>
</body>
</html>"#;

const FALLBACK_INDEX_CSS: &str = r#"@tailwind base;
@tailwind components;
@tailwind utilities;

body {
  font-family: 'Inter', sans-serif;
}"#;

const FALLBACK_MAIN_TSX: &str = r#"import React from 'react';
import ReactDOM from 'react-dom/client';
import App from './App';
import './index.css';

ReactDOM.createRoot(document.getElementById('root')!).render(
  <React.StrictMode>
    <App />
  </React.StrictMode>
);"#;

/// 模型回复解析失败时的兜底站,按提示词提取的站名定制。
pub fn fallback_site(prompt: &str) -> Vec<(String, String)> {
    let site_name = extract_site_name(prompt);
    let package_name = site_name.to_lowercase().replace(' ', "-");
    vec![
        (
            "src/App.tsx".to_string(),
            FALLBACK_APP_TSX
                .replace("{site_name}", &site_name)
                .replace("{prompt}", prompt),
        ),
        (
            "package.json".to_string(),
            FALLBACK_PACKAGE_JSON.replace("{package_name}", &package_name),
        ),
        (
            "index.html".to_string(),
            FALLBACK_INDEX_HTML.replace("{site_name}", &site_name),
        ),
        ("src/index.css".to_string(), FALLBACK_INDEX_CSS.to_string()),
        ("src/main.tsx".to_string(), FALLBACK_MAIN_TSX.to_string()),
    ]
}

/// 从提示词里取前两个实义词拼站名,取不到时用 "My Website"。
pub fn extract_site_name(prompt: &str) -> String {
    let Ok(word_re) = Regex::new(r"[a-z0-9'-]+") else {
        return "My Website".to_string();
    };
    let lowered = prompt.to_lowercase();
    let mut words: Vec<&str> = Vec::new();
    for found in word_re.find_iter(&lowered) {
        let word = found.as_str();
        if STOP_WORDS.contains(&word) {
            continue;
        }
        words.push(word);
        if words.len() == 2 {
            break;
        }
    }
    if words.is_empty() {
        return "My Website".to_string();
    }
    words
        .iter()
        .map(|word| capitalize(word))
        .collect::<Vec<String>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_site_has_the_expected_layout() {
        let files = sample_site("A portfolio website");
        let paths: Vec<&str> = files.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "package.json",
                "src/App.js",
                "src/App.css",
                "src/index.js",
                "public/index.html",
                "README.md",
            ]
        );
    }

    #[test]
    fn sample_app_embeds_the_prompt() {
        let files = sample_site("A bakery site with dark theme");
        let app = &files.iter().find(|(p, _)| p == "src/App.js").unwrap().1;
        assert!(app.contains("Built with AI from: \"A bakery site with dark theme\""));
        assert!(app.contains("Your Generated Website"));
    }

    #[test]
    fn sample_package_json_is_valid_json() {
        let files = sample_site("x");
        let raw = &files.iter().find(|(p, _)| p == "package.json").unwrap().1;
        let value: serde_json::Value = serde_json::from_str(raw).unwrap();
        assert_eq!(value["name"], "generated-website");
        assert_eq!(value["dependencies"]["react"], "^18.2.0");
    }

    #[test]
    fn site_name_takes_first_two_meaningful_words() {
        assert_eq!(
            extract_site_name("A portfolio website for a UX designer"),
            "Portfolio Ux"
        );
        assert_eq!(
            extract_site_name("An e-commerce store for handmade jewelry"),
            "E-commerce Store"
        );
        assert_eq!(extract_site_name("bakery"), "Bakery");
    }

    #[test]
    fn site_name_falls_back_when_nothing_meaningful_remains() {
        assert_eq!(extract_site_name(""), "My Website");
        assert_eq!(extract_site_name("the website"), "My Website");
        assert_eq!(extract_site_name("!!!"), "My Website");
    }

    #[test]
    fn fallback_site_is_keyed_by_site_name() {
        let files = fallback_site("An e-commerce store for handmade jewelry");
        let app = &files.iter().find(|(p, _)| p == "src/App.tsx").unwrap().1;
        assert!(app.contains("Welcome to E-commerce Store"));
        assert!(app.contains("your description: \"An e-commerce store for handmade jewelry\""));

        let pkg = &files.iter().find(|(p, _)| p == "package.json").unwrap().1;
        let value: serde_json::Value = serde_json::from_str(pkg).unwrap();
        assert_eq!(value["name"], "e-commerce-store");

        let html = &files.iter().find(|(p, _)| p == "index.html").unwrap().1;
        assert!(html.contains("<title>E-commerce Store</title>"));
    }

    #[test]
    fn fallback_site_is_never_empty() {
        assert!(!fallback_site("").is_empty());
    }
}
