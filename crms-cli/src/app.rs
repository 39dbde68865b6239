//! Interactive front-end
//!
//! A role-aware menu over the client workflows: overview, browse-and-book,
//! the user's own reservations and, for administrators, the admin overview.

use std::io::{BufRead, Write};
use std::sync::Arc;

use chrono::{Duration, Local, NaiveDate};
use crms_client::dashboard::{AdminOverview, HomeOverview, StatCard};
use crms_client::{
    CatalogLoader, CatalogView, ClientError, Dashboard, MyReservations, Notifier,
    ReservationEntry, ResourceKind, Session, StatusBadge, SubmitContext, TableClient, TimeSlot,
};
use uuid::Uuid;

use crate::console::Console;

/// Navigation entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Dashboard,
    Reservations,
    MyReservations,
    Admin,
    SignOut,
}

impl MenuItem {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Reservations => "Reservations",
            Self::MyReservations => "My Reservations",
            Self::Admin => "Admin",
            Self::SignOut => "Sign out",
        }
    }
}

/// Menu for a session; the admin entry only for administrators
pub fn navigation(session: &Session) -> Vec<MenuItem> {
    let mut items = vec![
        MenuItem::Dashboard,
        MenuItem::Reservations,
        MenuItem::MyReservations,
    ];
    if session.is_admin() {
        items.push(MenuItem::Admin);
    }
    items.push(MenuItem::SignOut);
    items
}

/// How the menu loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    SignOut,
    Quit,
}

fn render_stats(stats: &[StatCard]) -> String {
    stats
        .iter()
        .map(|card| match &card.change {
            Some(change) => format!("  {:<20} {:>6}   {}", card.title, card.value, change.text()),
            None => format!("  {:<20} {:>6}", card.title, card.value),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_home(home: &HomeOverview) -> String {
    let mut out = format!("\n== Dashboard ==\n{}\n\nQuick Access", render_stats(&home.stats));
    for entry in home.quick_access {
        out.push_str(&format!("\n  {} - {}", entry.title, entry.description));
    }
    out
}

fn render_admin(overview: &AdminOverview) -> String {
    let mut out = format!(
        "\n== Admin Dashboard ==\n{}\n{}\n\nRecent Activity",
        overview.greeting,
        render_stats(&overview.stats)
    );
    if overview.activity.is_empty() {
        out.push_str("\n  No reservations yet");
    }
    for item in &overview.activity {
        out.push_str(&format!("\n  {}: {} ({})", item.title, item.detail, item.when));
    }
    out
}

fn badge_marker(badge: StatusBadge) -> &'static str {
    match badge {
        StatusBadge::Success => "✓",
        StatusBadge::Warning => "…",
        StatusBadge::Destructive => "✗",
        StatusBadge::Muted => "·",
    }
}

fn render_entry(index: usize, entry: &ReservationEntry) -> String {
    let kind = entry.reservation.resource_type;
    let name = entry
        .resource_name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("Unknown {kind}"));
    let mut out = format!("  {index}. {name}");
    if let Some(detail) = entry.resource_detail() {
        out.push_str(&format!(" - {detail}"));
    }
    out.push_str(&format!(
        "  [{} {}]\n     {}\n     {}",
        badge_marker(entry.status_badge()),
        entry.reservation.status,
        entry.date_line(),
        entry.time_line()
    ));
    if let Some(notes) = &entry.reservation.notes {
        out.push_str(&format!("\n     Notes: {notes}"));
    }
    out
}

fn slot_help() -> String {
    TimeSlot::all()
        .map(|slot| format!("{} ({})", slot.value(), slot.label()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// One signed-in session of the front-end
pub struct App {
    backend: Arc<dyn TableClient>,
    notifier: Arc<dyn Notifier>,
    session: Session,
    catalog: CatalogView,
    mine: MyReservations,
    dashboard: Dashboard,
}

impl App {
    pub fn new(backend: Arc<dyn TableClient>, notifier: Arc<dyn Notifier>, session: Session) -> Self {
        Self {
            catalog: CatalogView::new(CatalogLoader::new(backend.clone(), notifier.clone())),
            mine: MyReservations::new(backend.clone(), notifier.clone()),
            dashboard: Dashboard::new(backend.clone(), notifier.clone()),
            backend,
            notifier,
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Menu loop until sign-out, quit or end of input
    pub async fn run<R: BufRead, W: Write>(
        &mut self,
        console: &mut Console<R, W>,
    ) -> anyhow::Result<Exit> {
        loop {
            let items = navigation(&self.session);
            console.say(format!("\n=== Campus Resources === ({})", self.session.short_name()))?;
            for (i, item) in items.iter().enumerate() {
                console.say(format!("  {}. {}", i + 1, item.label()))?;
            }
            console.say("  q. Quit")?;

            let Some(choice) = console.ask("> ")? else {
                return Ok(Exit::Quit);
            };
            if choice.eq_ignore_ascii_case("q") {
                return Ok(Exit::Quit);
            }
            let Some(item) = choice
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| items.get(i).copied())
            else {
                console.say("Unknown option.")?;
                continue;
            };

            match item {
                MenuItem::Dashboard => self.show_dashboard(console).await?,
                MenuItem::Reservations => self.browse(console).await?,
                MenuItem::MyReservations => self.my_reservations(console).await?,
                MenuItem::Admin => self.show_admin(console).await?,
                MenuItem::SignOut => return Ok(Exit::SignOut),
            }
        }
    }

    async fn show_dashboard<R: BufRead, W: Write>(
        &mut self,
        console: &mut Console<R, W>,
    ) -> anyhow::Result<()> {
        let home = self.dashboard.home().await;
        console.say(render_home(&home))?;
        Ok(())
    }

    async fn show_admin<R: BufRead, W: Write>(
        &mut self,
        console: &mut Console<R, W>,
    ) -> anyhow::Result<()> {
        match self.dashboard.admin(&self.session).await {
            Ok(overview) => console.say(render_admin(&overview))?,
            Err(ClientError::Forbidden(_)) => {
                console.say("You need administrator access to view this page.")?
            }
            // already reported through the notifier
            Err(_) => {}
        }
        Ok(())
    }

    async fn browse<R: BufRead, W: Write>(
        &mut self,
        console: &mut Console<R, W>,
    ) -> anyhow::Result<()> {
        self.catalog.refresh().await;

        loop {
            let mut targets: Vec<(Uuid, ResourceKind)> = Vec::new();
            let mut lines = Vec::new();
            {
                let filtered = self.catalog.filtered();
                if self.catalog.catalog().is_empty() {
                    lines.push("\nNothing is available to reserve right now.".to_string());
                }
                if !self.catalog.search().is_empty() {
                    lines.push(format!("\nSearch: \"{}\"", self.catalog.search()));
                }
                lines.push("\nRooms".to_string());
                if filtered.rooms.is_empty() {
                    lines.push("  No rooms found".to_string());
                }
                for room in &filtered.rooms {
                    targets.push((room.id, ResourceKind::Room));
                    let mut line = format!(
                        "  {}. {} ({}) - capacity {}",
                        targets.len(),
                        room.name,
                        room.location,
                        room.capacity
                    );
                    if !room.amenities.is_empty() {
                        line.push_str(&format!(" - {}", room.amenities.join(", ")));
                    }
                    lines.push(line);
                }
                lines.push("Equipment".to_string());
                if filtered.equipment.is_empty() {
                    lines.push("  No equipment found".to_string());
                }
                for item in &filtered.equipment {
                    targets.push((item.id, ResourceKind::Equipment));
                    let mut line = format!("  {}. {} [{}]", targets.len(), item.name, item.equipment_type);
                    if let Some(description) = &item.description {
                        line.push_str(&format!(" - {description}"));
                    }
                    lines.push(line);
                }
            }
            for line in lines {
                console.say(line)?;
            }

            let Some(choice) = console.ask("\n[number] reserve, [s] search, [r] refresh, [b] back: ")?
            else {
                return Ok(());
            };
            match choice.to_ascii_lowercase().as_str() {
                "b" | "" => return Ok(()),
                "r" => self.catalog.refresh().await,
                "s" => {
                    let Some(search) = console.ask("Search by name, location or type: ")? else {
                        return Ok(());
                    };
                    self.catalog.set_search(search);
                }
                other => {
                    let target = other
                        .parse::<usize>()
                        .ok()
                        .and_then(|n| n.checked_sub(1))
                        .and_then(|i| targets.get(i).copied());
                    if let Some((id, kind)) = target
                        && self.catalog.select(id, kind)
                    {
                        self.book(console).await?;
                    } else {
                        console.say("Unknown option.")?;
                    }
                }
            }
        }
    }

    /// Fill in and submit the open form until it succeeds or is abandoned
    async fn book<R: BufRead, W: Write>(
        &mut self,
        console: &mut Console<R, W>,
    ) -> anyhow::Result<()> {
        let tomorrow = Local::now().date_naive() + Duration::days(1);
        let about = self
            .catalog
            .selection()
            .and_then(|form| self.catalog.catalog().find(form.resource().id, form.resource().kind))
            .and_then(|resource| resource.description().map(str::to_string));

        loop {
            let Some(form) = self.catalog.selection_mut() else {
                return Ok(());
            };
            console.say(format!("\n{}\n{}", form.title(), form.subtitle()))?;
            if let Some(about) = &about {
                console.say(about)?;
            }

            // a retry starts from what the form still holds
            let default_date = form.date().unwrap_or(tomorrow).format("%Y-%m-%d").to_string();
            let Some(date) = console.ask_with_default("Date (YYYY-MM-DD)", &default_date)? else {
                self.catalog.close();
                return Ok(());
            };
            match NaiveDate::parse_from_str(&date, "%Y-%m-%d") {
                Ok(date) => form.set_date(Some(date)),
                Err(_) => {
                    console.say("Not a date; use YYYY-MM-DD.")?;
                    form.set_date(None);
                }
            }

            console.say(format!("Time slots: {}", slot_help()))?;
            for (prompt, is_start) in [("Start time (HH:MM)", true), ("End time (HH:MM)", false)] {
                let current = if is_start { form.start() } else { form.end() };
                let answer = match current {
                    Some(slot) => console.ask_with_default(prompt, &slot.value())?,
                    None => console.ask(&format!("{prompt}: "))?,
                };
                let Some(value) = answer else {
                    self.catalog.close();
                    return Ok(());
                };
                let selected = if is_start {
                    form.select_start(&value)
                } else {
                    form.select_end(&value)
                };
                if let Err(e) = selected {
                    console.say(e.description())?;
                    if is_start {
                        form.set_start(None);
                    } else {
                        form.set_end(None);
                    }
                }
            }

            let Some(notes) = console.ask("Notes (optional): ")? else {
                self.catalog.close();
                return Ok(());
            };
            form.set_notes(notes);

            let ctx = SubmitContext {
                backend: self.backend.as_ref(),
                session: Some(&self.session),
                notifier: self.notifier.as_ref(),
            };
            if self.catalog.submit_selection(&ctx, || {}).await.is_ok() {
                return Ok(());
            }
            if !console.confirm("Edit and try again?")? {
                self.catalog.close();
                return Ok(());
            }
        }
    }

    async fn my_reservations<R: BufRead, W: Write>(
        &mut self,
        console: &mut Console<R, W>,
    ) -> anyhow::Result<()> {
        // failures are reported through the notifier
        let _ = self.mine.load(Some(&self.session)).await;

        loop {
            console.say("\n== My Reservations ==")?;
            if self.mine.is_empty() {
                console.say("  No reservations found\n  Start by booking a room or equipment!")?;
            }
            for (i, entry) in self.mine.entries().iter().enumerate() {
                console.say(render_entry(i + 1, entry))?;
            }

            let Some(choice) = console.ask("\n[number] cancel, [r] refresh, [b] back: ")? else {
                return Ok(());
            };
            match choice.to_ascii_lowercase().as_str() {
                "b" | "" => return Ok(()),
                "r" => {
                    let _ = self.mine.load(Some(&self.session)).await;
                }
                other => {
                    let entry = other
                        .parse::<usize>()
                        .ok()
                        .and_then(|n| n.checked_sub(1))
                        .and_then(|i| self.mine.entries().get(i));
                    let Some(entry) = entry else {
                        console.say("Unknown option.")?;
                        continue;
                    };
                    if !entry.can_cancel() {
                        console.say("Only pending reservations can be cancelled.")?;
                        continue;
                    }
                    let id = entry.reservation.id;
                    if console.confirm("Cancel this reservation?")? {
                        let _ = self.mine.cancel(Some(&self.session), id).await;
                    }
                }
            }
        }
    }
}
