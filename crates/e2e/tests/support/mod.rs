//! In-memory translator page for driving the checks without a browser

#![allow(dead_code)]

use async_trait::async_trait;
use std::future;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use swiftcheck_e2e::{E2eError, E2eResult, LoadState, Locator, LocatorStep, Page, PageSource};

pub type NodeId = usize;

#[derive(Debug, Clone, Default)]
pub struct Node {
    pub tag: String,
    pub role: Option<String>,
    pub name: String,
    pub text: String,
    pub visible: bool,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// A tiny DOM: node 0 is the document root
#[derive(Debug, Clone)]
pub struct Dom {
    nodes: Vec<Node>,
}

impl Default for Dom {
    fn default() -> Self {
        Self {
            nodes: vec![Node {
                tag: "html".into(),
                visible: true,
                ..Default::default()
            }],
        }
    }
}

impl Dom {
    pub const ROOT: NodeId = 0;

    pub fn add(&mut self, parent: NodeId, tag: &str, text: &str) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            tag: tag.into(),
            text: text.into(),
            visible: true,
            parent: Some(parent),
            ..Default::default()
        });
        self.nodes[parent].children.push(id);
        id
    }

    pub fn add_role(&mut self, parent: NodeId, tag: &str, role: &str, name: &str, text: &str) -> NodeId {
        let id = self.add(parent, tag, text);
        self.nodes[id].role = Some(role.into());
        self.nodes[id].name = name.into();
        id
    }

    pub fn set_text(&mut self, id: NodeId, text: &str) {
        self.nodes[id].text = text.into();
    }

    pub fn text(&self, id: NodeId) -> &str {
        &self.nodes[id].text
    }

    pub fn hide(&mut self, id: NodeId) {
        self.nodes[id].visible = false;
    }

    fn descendants(&self, id: NodeId, out: &mut Vec<NodeId>) {
        for &child in &self.nodes[id].children {
            out.push(child);
            self.descendants(child, out);
        }
    }

    fn inner_text(&self, id: NodeId) -> String {
        let mut parts = Vec::new();
        if !self.nodes[id].text.is_empty() {
            parts.push(self.nodes[id].text.clone());
        }
        for &child in &self.nodes[id].children {
            let text = self.inner_text(child);
            if !text.is_empty() {
                parts.push(text);
            }
        }
        parts.join("\n")
    }

    fn is_visible(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(n) = current {
            if !self.nodes[n].visible {
                return false;
            }
            current = self.nodes[n].parent;
        }
        true
    }

    fn matches_css(&self, id: NodeId, selector: &str) -> bool {
        let node = &self.nodes[id];
        selector.split(',').map(str::trim).any(|part| {
            match part.strip_prefix("[role='").and_then(|r| r.strip_suffix("']")) {
                Some(role) => node.role.as_deref() == Some(role),
                None => node.tag == part,
            }
        })
    }

    fn step(&self, set: Vec<NodeId>, step: &LocatorStep) -> Vec<NodeId> {
        let mut out = Vec::new();
        let push = |id: NodeId, out: &mut Vec<NodeId>| {
            if !out.contains(&id) {
                out.push(id);
            }
        };

        match step {
            LocatorStep::Role { role, name } => {
                for id in set {
                    let mut desc = Vec::new();
                    self.descendants(id, &mut desc);
                    for d in desc {
                        let node = &self.nodes[d];
                        if node.role.as_deref() == Some(role.as_str())
                            && node.name.to_lowercase().contains(&name.to_lowercase())
                        {
                            push(d, &mut out);
                        }
                    }
                }
            }
            LocatorStep::Text { text, exact } => {
                for id in set {
                    let mut desc = Vec::new();
                    self.descendants(id, &mut desc);
                    for d in desc {
                        let own = self.nodes[d].text.trim();
                        let hit = if *exact {
                            own == text
                        } else {
                            own.to_lowercase().contains(&text.to_lowercase())
                        };
                        if hit {
                            push(d, &mut out);
                        }
                    }
                }
            }
            LocatorStep::Css { selector } => {
                for id in set {
                    let mut desc = Vec::new();
                    self.descendants(id, &mut desc);
                    for d in desc {
                        if self.matches_css(d, selector) {
                            push(d, &mut out);
                        }
                    }
                }
            }
            LocatorStep::Parent => {
                for id in set {
                    if let Some(p) = self.nodes[id].parent {
                        push(p, &mut out);
                    }
                }
            }
            LocatorStep::FollowingSibling => {
                for id in set {
                    let Some(p) = self.nodes[id].parent else { continue };
                    let siblings = &self.nodes[p].children;
                    if let Some(pos) = siblings.iter().position(|&s| s == id) {
                        if let Some(&next) = siblings.get(pos + 1) {
                            push(next, &mut out);
                        }
                    }
                }
            }
            LocatorStep::First => out.extend(set.into_iter().take(1)),
            LocatorStep::Nth { index } => out.extend(set.into_iter().nth(*index)),
            LocatorStep::HasNot { inner } => {
                for id in set {
                    if self.resolve_from(vec![id], inner).is_empty() {
                        push(id, &mut out);
                    }
                }
            }
        }
        out
    }

    fn resolve_from(&self, start: Vec<NodeId>, locator: &Locator) -> Vec<NodeId> {
        locator
            .steps
            .iter()
            .fold(start, |set, step| self.step(set, step))
    }

    pub fn resolve(&self, locator: &Locator) -> Vec<NodeId> {
        self.resolve_from(vec![Self::ROOT], locator)
    }
}

/// Something done to the page, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Goto(String),
    Fill(String),
    Click,
    Type(String),
    Screenshot(PathBuf),
    Close,
}

pub type Translate = Arc<dyn Fn(&str) -> String + Send + Sync>;

struct State {
    dom: Dom,
    actions: Vec<Action>,
}

/// Clones share the same page
#[derive(Clone)]
pub struct FakePage {
    state: Arc<Mutex<State>>,
    input: NodeId,
    output: NodeId,
    translate: Translate,
    stall_navigation: bool,
}

impl FakePage {
    pub fn new(dom: Dom, input: NodeId, output: NodeId, translate: Translate) -> Self {
        Self {
            state: Arc::new(Mutex::new(State { dom, actions: Vec::new() })),
            input,
            output,
            translate,
            stall_navigation: false,
        }
    }

    /// Navigation never completes
    pub fn stalled(mut self) -> Self {
        self.stall_navigation = true;
        self
    }

    pub fn actions(&self) -> Vec<Action> {
        self.state.lock().unwrap().actions.clone()
    }

    /// Hide every element `locator` matches
    pub fn hide(&self, locator: &Locator) {
        let mut state = self.state.lock().unwrap();
        for id in state.dom.resolve(locator) {
            state.dom.hide(id);
        }
    }

    fn record(&self, action: Action) {
        self.state.lock().unwrap().actions.push(action);
    }

    fn first(&self, locator: &Locator) -> E2eResult<NodeId> {
        let state = self.state.lock().unwrap();
        state
            .dom
            .resolve(locator)
            .first()
            .copied()
            .ok_or_else(|| E2eError::ElementNotFound(locator.to_string()))
    }

    fn set_input(&self, id: NodeId, value: String) {
        let mut state = self.state.lock().unwrap();
        state.dom.set_text(id, &value);
        if id == self.input {
            let translated = if value.is_empty() { String::new() } else { (self.translate)(&value) };
            state.dom.set_text(self.output, &translated);
        }
    }
}

#[async_trait]
impl Page for FakePage {
    async fn goto(&self, url: &str, _wait_until: LoadState) -> E2eResult<()> {
        self.record(Action::Goto(url.to_string()));
        if self.stall_navigation {
            future::pending::<()>().await;
        }
        Ok(())
    }

    async fn is_visible(&self, locator: &Locator) -> E2eResult<bool> {
        let state = self.state.lock().unwrap();
        Ok(state
            .dom
            .resolve(locator)
            .first()
            .map(|&id| state.dom.is_visible(id))
            .unwrap_or(false))
    }

    async fn count(&self, locator: &Locator) -> E2eResult<usize> {
        Ok(self.state.lock().unwrap().dom.resolve(locator).len())
    }

    async fn inner_text(&self, locator: &Locator) -> E2eResult<String> {
        let id = self.first(locator)?;
        Ok(self.state.lock().unwrap().dom.inner_text(id))
    }

    async fn fill(&self, locator: &Locator, value: &str) -> E2eResult<()> {
        let id = self.first(locator)?;
        self.record(Action::Fill(value.to_string()));
        self.set_input(id, value.to_string());
        Ok(())
    }

    async fn click(&self, locator: &Locator) -> E2eResult<()> {
        self.first(locator)?;
        self.record(Action::Click);
        Ok(())
    }

    async fn type_text(&self, locator: &Locator, text: &str, delay: Duration) -> E2eResult<()> {
        let id = self.first(locator)?;
        self.record(Action::Type(text.to_string()));
        let mut typed = self.state.lock().unwrap().dom.text(id).to_string();
        for c in text.chars() {
            typed.push(c);
            self.set_input(id, typed.clone());
            tokio::time::sleep(delay).await;
        }
        Ok(())
    }

    async fn screenshot(&self, path: &Path) -> E2eResult<()> {
        self.record(Action::Screenshot(path.to_path_buf()));
        Ok(())
    }

    async fn close(&self) -> E2eResult<()> {
        self.record(Action::Close);
        Ok(())
    }
}

/// Builds a fresh page per case and keeps a handle to each one
pub struct FakePageSource {
    factory: Box<dyn Fn() -> FakePage + Send + Sync>,
    opened: Mutex<Vec<FakePage>>,
}

impl FakePageSource {
    pub fn new(factory: impl Fn() -> FakePage + Send + Sync + 'static) -> Self {
        Self {
            factory: Box::new(factory),
            opened: Mutex::new(Vec::new()),
        }
    }

    pub fn opened(&self) -> Vec<FakePage> {
        self.opened.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageSource for FakePageSource {
    async fn open_page(&self) -> E2eResult<Box<dyn Page>> {
        let page = (self.factory)();
        self.opened.lock().unwrap().push(page.clone());
        Ok(Box::new(page))
    }
}

/// Word-by-word dictionary translation, unknown words passed through
pub fn dictionary(entries: &[(&str, &str)]) -> Translate {
    let entries: Vec<(String, String)> = entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Arc::new(move |input: &str| {
        input
            .split_whitespace()
            .map(|word| {
                entries
                    .iter()
                    .find(|(k, _)| k == word)
                    .map(|(_, v)| v.clone())
                    .unwrap_or_else(|| word.to_string())
            })
            .collect::<Vec<_>>()
            .join(" ")
    })
}

pub fn default_dictionary() -> Translate {
    dictionary(&[("mama", "මම"), ("gedhara", "ගෙදර"), ("yanavaa", "යනවා")])
}

/// The translator layout: the output is the heading's next sibling
pub fn translator_page(translate: Translate) -> FakePage {
    let mut dom = Dom::default();
    let body = dom.add(Dom::ROOT, "body", "");
    let container = dom.add(body, "div", "");

    let input_panel = dom.add(container, "div", "");
    dom.add(input_panel, "div", "Singlish");
    let input = dom.add_role(input_panel, "textarea", "textbox", "Input Your Singlish Text Here", "");

    let swap = dom.add(container, "div", "");
    dom.add_role(swap, "button", "button", "Swap Languages", "⇄");

    let output_panel = dom.add(container, "div", "");
    dom.add(output_panel, "div", "Sinhala");
    let output = dom.add(output_panel, "div", "");
    let toolbar = dom.add(output_panel, "div", "");
    dom.add_role(toolbar, "button", "button", "Copy", "Copy");

    FakePage::new(dom, input, output, translate)
}

/// A layout where the heading's sibling is a toolbar and the output sits
/// deeper in the panel, next to a shorter hint and a long Sinhala button label
pub fn nested_output_page(translate: Translate) -> FakePage {
    let mut dom = Dom::default();
    let body = dom.add(Dom::ROOT, "body", "");
    let container = dom.add(body, "div", "");

    let input_panel = dom.add(container, "div", "");
    let input = dom.add_role(input_panel, "textarea", "textbox", "Input Your Singlish Text Here", "");

    let swap = dom.add(container, "div", "");
    dom.add_role(swap, "button", "button", "Swap Languages", "⇄");

    let output_panel = dom.add(container, "div", "");
    dom.add(output_panel, "div", "Sinhala");
    let toolbar = dom.add(output_panel, "div", "");
    dom.add_role(toolbar, "button", "button", "Copy", "Copy");
    dom.add(output_panel, "p", "අ");
    let wrapper = dom.add(output_panel, "div", "");
    let output = dom.add(wrapper, "span", "");
    let controls = dom.add(output_panel, "div", "");
    dom.add_role(controls, "button", "button", "Share", "පිටපත් කරන්න සහ බෙදාගන්න");

    FakePage::new(dom, input, output, translate)
}

/// A layout whose output never shows Sinhala text
pub fn silent_page() -> FakePage {
    let mut dom = Dom::default();
    let container = dom.add(Dom::ROOT, "div", "");
    let input = dom.add_role(container, "textarea", "textbox", "Input Your Singlish Text Here", "");
    let swap = dom.add(container, "div", "");
    dom.add_role(swap, "button", "button", "Swap Languages", "⇄");
    let output_panel = dom.add(container, "div", "");
    dom.add(output_panel, "div", "Sinhala");
    let output = dom.add(output_panel, "div", "");

    FakePage::new(dom, input, output, Arc::new(|_: &str| String::new()))
}
