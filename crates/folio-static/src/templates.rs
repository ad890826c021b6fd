//! Page templates for the blog.

use chrono::{DateTime, NaiveDate};
use minijinja::{context, Environment};
use serde::Serialize;

use folio_content::Post;
use folio_mdx::{slugify, RenderedContent, TocEntry};

/// Site-wide settings shared by every page.
#[derive(Debug, Clone, Serialize)]
pub struct Site {
    pub title: String,
    pub description: String,
    /// Prefix for every link, always ending in `/`
    pub base_url: String,
}

impl Default for Site {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),
            description: String::new(),
            base_url: "/".to_string(),
        }
    }
}

impl Site {
    /// URL of a post page.
    pub fn post_url(&self, slug: &str) -> String {
        format!("{}blog/{}/", self.base_url, slug)
    }

    /// URL of a category listing.
    pub fn category_url(&self, category: &str) -> String {
        format!("{}category/{}/", self.base_url, slugify(category))
    }
}

/// A post as shown in listings.
#[derive(Debug, Clone, Serialize)]
pub struct PostCard {
    pub slug: String,
    pub title: String,
    pub url: String,
    pub date: Option<String>,
    /// Long-form date, e.g. "January 1, 2024"
    pub date_display: Option<String>,
    pub category: Option<String>,
    pub category_url: Option<String>,
    pub excerpt: Option<String>,
    pub reading_time: String,
}

impl PostCard {
    pub fn new(post: &Post, site: &Site) -> Self {
        Self {
            slug: post.slug.clone(),
            title: post.display_title().to_string(),
            url: site.post_url(&post.slug),
            date: post.date.clone(),
            date_display: post.date.as_deref().map(format_date),
            category: post.category.clone(),
            category_url: post.category.as_deref().map(|c| site.category_url(c)),
            excerpt: post.excerpt.clone(),
            reading_time: post.reading_time.clone(),
        }
    }
}

/// A category in the listing header.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryLink {
    pub name: String,
    pub url: String,
}

impl CategoryLink {
    pub fn new(name: &str, site: &Site) -> Self {
        Self {
            name: name.to_string(),
            url: site.category_url(name),
        }
    }
}

/// Format a frontmatter date as "January 1, 2024".
///
/// Dates that are neither `YYYY-MM-DD` nor RFC 3339 are returned unchanged.
pub fn format_date(date: &str) -> String {
    const LONG_DATE: &str = "%B %-d, %Y";

    if let Ok(day) = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d") {
        return day.format(LONG_DATE).to_string();
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(date.trim()) {
        return timestamp.format(LONG_DATE).to_string();
    }

    date.to_string()
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a template engine with the built-in templates.
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();

        env.add_template_owned("base.html".to_string(), BASE_TEMPLATE.to_string())?;
        env.add_template_owned("index.html".to_string(), INDEX_TEMPLATE.to_string())?;
        env.add_template_owned("post.html".to_string(), POST_TEMPLATE.to_string())?;
        env.add_template_owned("404.html".to_string(), NOT_FOUND_TEMPLATE.to_string())?;

        Ok(Self { env })
    }

    /// Render a post listing.
    ///
    /// `heading` names the category for category pages; the home page passes `None`.
    pub fn render_index(
        &self,
        site: &Site,
        heading: Option<&str>,
        posts: &[PostCard],
        categories: &[CategoryLink],
    ) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("index.html")?;

        tmpl.render(context! {
            site => site,
            title => heading.unwrap_or(site.title.as_str()),
            heading => heading,
            posts => posts,
            categories => categories,
        })
    }

    /// Render a single post with its rendered body.
    pub fn render_post(
        &self,
        site: &Site,
        post: &Post,
        rendered: &RenderedContent,
    ) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("post.html")?;
        let toc: &[TocEntry] = &rendered.toc;

        tmpl.render(context! {
            site => site,
            title => post.display_title(),
            post => PostCard::new(post, site),
            content => &rendered.html,
            toc => toc,
        })
    }

    /// Render the not-found page.
    pub fn render_not_found(&self, site: &Site) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("404.html")?;

        tmpl.render(context! {
            site => site,
            title => "Post not found",
        })
    }
}

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{% if title != site.title %}{{ title }} - {% endif %}{{ site.title }}</title>
  {% if site.description %}<meta name="description" content="{{ site.description }}">
  {% endif %}<link rel="stylesheet" href="{{ site.base_url }}assets/main.css">
</head>
<body>
  <header class="site-header">
    <a href="{{ site.base_url }}" class="site-title">{{ site.title }}</a>
    <nav class="site-nav">
      <a href="{{ site.base_url }}">Posts</a>
    </nav>
  </header>
  {% block main %}{% endblock %}
  <script src="{{ site.base_url }}assets/main.js"></script>
</body>
</html>"##;

const INDEX_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block main %}
<main class="main single">
  <section>
    {% if heading %}<h1 class="heading heading-1">{{ heading }}</h1>{% endif %}
    {% if categories %}
    <nav class="categories">
      {% for category in categories %}<a href="{{ category.url }}">{{ category.name }}</a>
      {% endfor %}
    </nav>
    {% endif %}
    {% if posts %}
    <ul class="post-list">
    {% for post in posts %}
      <li class="post-card">
        <h2><a href="{{ post.url }}">{{ post.title }}</a></h2>
        <div class="post-meta">
          {% if post.date_display %}<time datetime="{{ post.date }}">{{ post.date_display }}</time>{% endif %}
          {% if post.category %}<a href="{{ post.category_url }}">{{ post.category }}</a>{% endif %}
          <span>{{ post.reading_time }}</span>
        </div>
        {% if post.excerpt %}<p class="post-excerpt">{{ post.excerpt }}</p>{% endif %}
      </li>
    {% endfor %}
    </ul>
    {% else %}
    <p class="prose-p">No posts yet.</p>
    {% endif %}
  </section>
</main>
{% endblock %}"##;

const POST_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block main %}
<main class="main{% if not toc %} single{% endif %}">
  <article>
    <header class="post-header">
      <h1>{{ post.title }}</h1>
      {% if post.excerpt %}<p class="post-excerpt">{{ post.excerpt }}</p>{% endif %}
      <div class="post-meta">
        {% if post.date_display %}<time datetime="{{ post.date }}">{{ post.date_display }}</time>{% endif %}
        {% if post.category %}<a href="{{ post.category_url }}">{{ post.category }}</a>{% endif %}
        <span>{{ post.reading_time }}</span>
      </div>
    </header>
    <div class="content">
      {{ content | safe }}
    </div>
  </article>

  {% if toc %}
  <aside class="toc">
    <h2>On this page</h2>
    <ul>
    {% for entry in toc %}
      <li class="toc-level-{{ entry.level }}">
        <a href="#{{ entry.id }}">{{ entry.title }}</a>
      </li>
    {% endfor %}
    </ul>
  </aside>
  {% endif %}
</main>
{% endblock %}"##;

const NOT_FOUND_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block main %}
<main class="main single">
  <section class="not-found">
    <h1 class="heading heading-1">Post not found</h1>
    <p class="prose-p">The post you are looking for does not exist.</p>
    <p class="prose-p"><a class="prose-link" href="{{ site.base_url }}">Back to all posts</a></p>
  </section>
</main>
{% endblock %}"##;
