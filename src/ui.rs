use crate::models::{TaskStats, User};
use crate::records::DEFAULT_CATEGORY_COLOR;
use crate::stats::rounded_percentage;

/// Category colors offered by the page, the first being the default.
pub const PALETTE: [&str; 12] = [
    DEFAULT_CATEGORY_COLOR,
    "#33FF57",
    "#3357FF",
    "#FF33A8",
    "#33FFF6",
    "#F6FF33",
    "#A833FF",
    "#FF8C33",
    "#FF3366",
    "#66FF33",
    "#33CCFF",
    "#FF9933",
];

pub fn render_index(users: &[User]) -> String {
    let items = if users.is_empty() {
        r#"<li class="empty">No accounts yet. Create one with <code>POST /api/users</code>.</li>"#
            .to_string()
    } else {
        users
            .iter()
            .map(|user| {
                format!(
                    r#"<li><a href="/users/{id}">{name}</a><span class="muted">{email}</span></li>"#,
                    id = user.id,
                    name = escape_html(display_name(user)),
                    email = escape_html(&user.email),
                )
            })
            .collect::<Vec<_>>()
            .join("\n        ")
    };

    fill_template(INDEX_HTML, &[("STYLE", STYLE), ("USERS", items.as_str())])
}

pub fn render_profile(user: &User, stats: &TaskStats) -> String {
    let completion = rounded_percentage(stats.completed_tasks, stats.total_tasks);
    let categories = if stats.category_counts.is_empty() {
        r#"<p class="muted">No categorized tasks yet.</p>"#.to_string()
    } else {
        stats
            .category_counts
            .values()
            .map(|category| {
                let name = if category.name.is_empty() {
                    "Unnamed"
                } else {
                    category.name.as_str()
                };
                let color = escape_html(&category.color);
                format!(
                    r#"<div class="category">
          <div class="row"><span><i class="dot" style="background:{color}"></i>{name}</span><span>{count} tasks</span></div>
          <div class="bar" style="background:{color}20"><div class="fill" style="width:{width}%;background:{color}"></div></div>
        </div>"#,
                    name = escape_html(name),
                    count = category.total,
                    width = rounded_percentage(category.total, stats.total_tasks),
                )
            })
            .collect::<Vec<_>>()
            .join("\n        ")
    };

    let name = escape_html(display_name(user));
    let initials: String = display_name(user)
        .chars()
        .take(2)
        .collect::<String>()
        .to_uppercase();
    let avatar = match &user.avatar_url {
        Some(url) => format!(
            r#"<img class="avatar" src="{src}" alt="{name}" />"#,
            src = escape_html(url),
        ),
        None => format!(r#"<div class="avatar">{}</div>"#, escape_html(&initials)),
    };
    let palette = PALETTE
        .iter()
        .map(|color| {
            format!(r#"<option value="{color}" style="background:{color}">{color}</option>"#)
        })
        .collect::<Vec<_>>()
        .join("");

    fill_template(
        PROFILE_HTML,
        &[
            ("STYLE", STYLE),
            ("USER_ID", user.id.to_string().as_str()),
            ("AVATAR", avatar.as_str()),
            ("NAME", name.as_str()),
            ("EMAIL", escape_html(&user.email).as_str()),
            ("JOINED", user.created_at.format("%Y-%m-%d").to_string().as_str()),
            ("TOTAL", stats.total_tasks.to_string().as_str()),
            ("COMPLETED", stats.completed_tasks.to_string().as_str()),
            ("INCOMPLETE", stats.incomplete_tasks.to_string().as_str()),
            ("RATE", completion.to_string().as_str()),
            ("CATEGORIES", categories.as_str()),
            ("PALETTE", palette.as_str()),
        ],
    )
}

/// Replaces each `{{KEY}}` in one left-to-right pass. Substituted values
/// are never rescanned, so user text containing `{{...}}` stays literal.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let Some(close) = after.find("}}") else {
            out.push_str(&rest[open..]);
            return out;
        };
        let key = &after[..close];
        match values.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[open..open + close + 4]),
        }
        rest = &after[close + 2..];
    }
    out.push_str(rest);
    out
}

fn display_name(user: &User) -> &str {
    user.display_name.as_deref().unwrap_or(&user.email)
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

const STYLE: &str = r#"
    :root {
      --bg-1: #f8f3e6;
      --bg-2: #f5d3a7;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.86);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(860px, 100%);
      background: var(--card);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 28px;
    }

    .grid {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(280px, 1fr));
      gap: 20px;
    }

    .card {
      background: #fff;
      border-radius: 20px;
      padding: 22px;
      display: grid;
      gap: 14px;
    }

    .row {
      display: flex;
      justify-content: space-between;
      align-items: center;
      gap: 12px;
    }

    .bar {
      height: 8px;
      border-radius: 999px;
      background: #efe6da;
      overflow: hidden;
    }

    .fill {
      height: 100%;
      background: var(--accent);
    }

    .dot {
      display: inline-block;
      width: 12px;
      height: 12px;
      border-radius: 50%;
      margin-right: 8px;
    }

    .avatar {
      width: 64px;
      height: 64px;
      border-radius: 50%;
      background: var(--accent-2);
      color: #fff;
      display: grid;
      place-items: center;
      font-size: 1.3rem;
      object-fit: cover;
    }

    .rate {
      font-size: 2.4rem;
      font-weight: 700;
    }

    .muted {
      color: #7a746c;
      font-size: 0.9rem;
    }

    ul {
      list-style: none;
      margin: 0;
      padding: 0;
      display: grid;
      gap: 10px;
    }

    li {
      display: flex;
      justify-content: space-between;
      gap: 12px;
    }

    li.done span {
      text-decoration: line-through;
      color: #7a746c;
    }

    button {
      border: none;
      border-radius: 12px;
      padding: 6px 12px;
      background: var(--accent-2);
      color: #fff;
      cursor: pointer;
    }

    input,
    select {
      border: 1px solid #e4d8c8;
      border-radius: 12px;
      padding: 8px 12px;
      flex: 1;
    }
"#;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Task Board</title>
  <style>{{STYLE}}</style>
</head>
<body>
  <main class="app">
    <h1>Task Board</h1>
    <section class="card">
      <h2>Accounts</h2>
      <ul>
        {{USERS}}
      </ul>
    </section>
  </main>
</body>
</html>
"#;

const PROFILE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{NAME}} - Task Board</title>
  <style>{{STYLE}}</style>
</head>
<body>
  <main class="app" data-user="{{USER_ID}}">
    <section class="card">
      <div class="row" style="justify-content:flex-start">
        {{AVATAR}}
        <div>
          <h1>{{NAME}}</h1>
          <div class="muted">{{EMAIL}}</div>
        </div>
      </div>
      <div class="muted">Account created on {{JOINED}}</div>
    </section>

    <div class="grid">
      <section class="card">
        <h2>Task Overview</h2>
        <div class="row"><span>Total Tasks</span><span>{{TOTAL}}</span></div>
        <div class="bar"><div class="fill" style="width:100%"></div></div>
        <div class="row"><span>Completed Tasks</span><span>{{COMPLETED}} ({{RATE}}%)</span></div>
        <div class="bar"><div class="fill" style="width:{{RATE}}%"></div></div>
        <div class="row"><span>Still open</span><span>{{INCOMPLETE}}</span></div>
        <div>Task Completion Rate</div>
        <div class="rate">{{RATE}}%</div>
      </section>

      <section class="card">
        <h2>Tasks by Category</h2>
        {{CATEGORIES}}
      </section>
    </div>

    <section class="card">
      <h2>Tasks</h2>
      <form id="add-form" class="row">
        <input id="title" placeholder="New task" required />
        <select id="task-category"><option value="">No category</option></select>
        <input id="due-date" type="date" />
        <button type="submit">Add</button>
      </form>
      <ul id="tasks"></ul>
    </section>

    <section class="card">
      <h2>Categories</h2>
      <form id="category-form" class="row">
        <input id="category-name" placeholder="New category" required />
        <select id="category-color">{{PALETTE}}</select>
        <button type="submit">Add</button>
      </form>
      <ul id="categories"></ul>
      <div id="status" class="muted"></div>
    </section>
  </main>

  <script>
    const base = `/api/users/${document.querySelector('main').dataset.user}`;
    const list = document.getElementById('tasks');
    const categoryList = document.getElementById('categories');
    const categorySelect = document.getElementById('task-category');
    const statusEl = document.getElementById('status');

    const setStatus = (text) => {
      statusEl.textContent = text;
    };

    const request = async (path, options = {}) => {
      const res = await fetch(base + path, {
        headers: { 'content-type': 'application/json' },
        ...options
      });
      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Request failed');
      }
      return res.status === 204 ? null : res.json();
    };

    const reloadAfter = (promise) =>
      promise.then(() => location.reload()).catch((err) => setStatus(err.message));

    const button = (text, onClick) => {
      const el = document.createElement('button');
      el.type = 'button';
      el.textContent = text;
      el.addEventListener('click', onClick);
      return el;
    };

    const renderTasks = (tasks) => {
      list.replaceChildren();
      tasks.forEach((task) => {
        const item = document.createElement('li');
        item.classList.toggle('done', task.is_complete);

        const label = document.createElement('span');
        const parts = [task.title];
        if (task.category) parts.push(`[${task.category.name}]`);
        if (task.due_date) parts.push(`due ${task.due_date}`);
        label.textContent = parts.join(' ');

        const actions = document.createElement('div');
        actions.append(
          button(task.is_complete ? 'Reopen' : 'Done', () =>
            reloadAfter(request(`/tasks/${task.id}/toggle`, {
              method: 'POST',
              body: JSON.stringify({ is_complete: !task.is_complete })
            }))),
          button('Delete', () =>
            reloadAfter(request(`/tasks/${task.id}`, { method: 'DELETE' })))
        );
        item.append(label, actions);
        list.append(item);
      });
    };

    const renderCategories = (categories) => {
      categoryList.replaceChildren();
      categories.forEach((category) => {
        const option = document.createElement('option');
        option.value = category.id;
        option.textContent = category.name;
        categorySelect.append(option);

        const item = document.createElement('li');
        const label = document.createElement('span');
        const dot = document.createElement('i');
        dot.className = 'dot';
        dot.style.background = category.color;
        label.append(dot, category.name);

        const actions = document.createElement('div');
        actions.append(
          button('Rename', () => {
            const name = prompt('Category name', category.name);
            if (name === null) return;
            reloadAfter(request(`/categories/${category.id}`, {
              method: 'PUT',
              body: JSON.stringify({ name, color: category.color })
            }));
          }),
          button('Delete', () => {
            if (!confirm(`Delete "${category.name}"? Its tasks become uncategorized.`)) return;
            reloadAfter(request(`/categories/${category.id}`, { method: 'DELETE' }));
          })
        );
        item.append(label, actions);
        categoryList.append(item);
      });
    };

    document.getElementById('add-form').addEventListener('submit', (event) => {
      event.preventDefault();
      const body = {
        title: document.getElementById('title').value,
        category_id: categorySelect.value || null,
        due_date: document.getElementById('due-date').value || null
      };
      reloadAfter(request('/tasks', { method: 'POST', body: JSON.stringify(body) }));
    });

    document.getElementById('category-form').addEventListener('submit', (event) => {
      event.preventDefault();
      const body = {
        name: document.getElementById('category-name').value,
        color: document.getElementById('category-color').value
      };
      reloadAfter(request('/categories', { method: 'POST', body: JSON.stringify(body) }));
    });

    request('/categories')
      .then(renderCategories)
      .then(() => request('/tasks'))
      .then(renderTasks)
      .catch((err) => setStatus(err.message));
  </script>
</body>
</html>
"#;
