use diffcache::{GroupPosition, ItemFactory, Neighbors, TimelinePresenter};
use listdiff::Diffable;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug)]
enum Item {
    Event { id: &'static str, sender: &'static str, body: &'static str },
    DaySeparator { day: &'static str },
}

impl Diffable for Item {
    fn same_item(&self, other: &Self) -> bool {
        return match (self, other) {
            (Item::Event { id: a, .. }, Item::Event { id: b, .. }) => a == b,
            (Item::DaySeparator { day: a }, Item::DaySeparator { day: b }) => a == b,
            _ => false,
        };
    }

    fn same_content(&self, other: &Self) -> bool {
        return match (self, other) {
            (Item::Event { id: a, body: x, .. }, Item::Event { id: b, body: y, .. }) => a == b && x == y,
            _ => self.same_item(other),
        };
    }
}

struct Rows;

impl ItemFactory<Item> for Rows {
    type Output = String;

    fn build(&mut self, window: Neighbors<'_, Item>) -> Option<String> {
        let row = match window.item() {
            Item::Event { sender, body, .. } => {
                let group = GroupPosition::compute(&window, |item| match item {
                    Item::Event { sender, .. } => Some(*sender),
                    Item::DaySeparator { .. } => None,
                });
                format!("{:<7} {:<6} {}", format!("{group:?}"), sender, body)
            }
            Item::DaySeparator { day } => format!("-- {day} --"),
        };
        return Some(row);
    }
}

fn event(id: &'static str, sender: &'static str, body: &'static str) -> Item {
    return Item::Event { id, sender, body };
}

fn print_view(label: &str, view: &[String]) {
    println!("{label}");
    for row in view.iter().rev() {
        println!("  {row}");
    }
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    let mut presenter = TimelinePresenter::new(Rows);

    let mut timeline = vec![
        Item::DaySeparator { day: "Monday" },
        event("$1", "alice", "morning"),
        event("$2", "alice", "anyone up?"),
        event("$3", "bob", "yes"),
    ];
    let view = presenter.replace_with(timeline.clone());
    print_view("initial", &view);

    // bob keeps talking: the previous "bob" row turns from None into First.
    let view = presenter.push_item(event("$4", "bob", "coffee?"));
    timeline.push(event("$4", "bob", "coffee?"));
    print_view("after push", &view);

    // alice's second message is redacted: only its own row is rebuilt.
    timeline[2] = event("$2", "alice", "(deleted)");
    let view = presenter.replace_with(timeline.clone());
    print_view("after edit", &view);

    // The first message is removed: alice's remaining message stands alone.
    timeline.remove(1);
    let view = presenter.replace_with(timeline);
    print_view("after removal", &view);

    println!("{}", presenter.stats().report());
}
