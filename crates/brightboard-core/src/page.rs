//! Multi-page management. Each page snapshots an independent stroke list
//! plus its assistance points; the session orchestrates save-then-load
//! around [`PageManager::set_current`].

use crate::assist::AssistancePoint;
use crate::clock::Millis;
use crate::stroke::Stroke;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub type PageId = Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageError {
    #[error("Cannot delete the last remaining page")]
    LastPage,
    #[error("Page not found: {0}")]
    NotFound(PageId),
}

/// An isolated canvas workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub name: String,
    pub strokes: Vec<Stroke>,
    pub assistance_points: Vec<AssistancePoint>,
    pub created_at: Millis,
    pub updated_at: Millis,
}

impl Page {
    fn new(name: String, now: Millis) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            strokes: Vec::new(),
            assistance_points: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Owns the page set and the current-page pointer. The page list is
/// never empty and exactly one page is current.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageManager {
    pages: Vec<Page>,
    current: PageId,
}

impl PageManager {
    /// Start with a single empty page named "Page 1".
    pub fn new(now: Millis) -> Self {
        let page = Page::new("Page 1".to_string(), now);
        let current = page.id;
        Self {
            pages: vec![page],
            current,
        }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn current_id(&self) -> PageId {
        self.current
    }

    pub fn current(&self) -> &Page {
        // The invariants guarantee the current id is always present
        self.pages
            .iter()
            .find(|p| p.id == self.current)
            .expect("current page exists")
    }

    pub fn get(&self, id: PageId) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == id)
    }

    fn get_mut(&mut self, id: PageId) -> Option<&mut Page> {
        self.pages.iter_mut().find(|p| p.id == id)
    }

    /// Append a new empty page and make it current.
    pub fn add_page(&mut self, now: Millis) -> PageId {
        let name = format!("Page {}", self.pages.len() + 1);
        let page = Page::new(name, now);
        let id = page.id;
        self.pages.push(page);
        self.current = id;
        id
    }

    /// Remove a page. Deleting the last remaining page is rejected with
    /// the state unchanged. If the deleted page was current, the first
    /// remaining page becomes current.
    pub fn delete_page(&mut self, id: PageId) -> Result<(), PageError> {
        if self.pages.len() == 1 {
            return Err(PageError::LastPage);
        }
        let pos = self
            .pages
            .iter()
            .position(|p| p.id == id)
            .ok_or(PageError::NotFound(id))?;
        self.pages.remove(pos);
        if self.current == id {
            self.current = self.pages[0].id;
        }
        Ok(())
    }

    pub fn rename_page(&mut self, id: PageId, name: String, now: Millis) -> Result<(), PageError> {
        let page = self.get_mut(id).ok_or(PageError::NotFound(id))?;
        page.name = name;
        page.updated_at = now;
        Ok(())
    }

    /// Deep-copy a page into a new current page named "{name} (Copy)".
    /// Stroke ids are regenerated so ids stay unique across the session;
    /// assistance-point stroke references are remapped to the copies.
    pub fn duplicate_page(&mut self, id: PageId, now: Millis) -> Result<PageId, PageError> {
        let source = self.get(id).ok_or(PageError::NotFound(id))?;
        let mut copy = Page::new(format!("{} (Copy)", source.name), now);
        copy.assistance_points = source.assistance_points.clone();
        for stroke in &source.strokes {
            let old_id = stroke.id();
            let mut cloned = stroke.clone();
            cloned.regenerate_id();
            for point in &mut copy.assistance_points {
                if point.stroke == old_id {
                    point.stroke = cloned.id();
                }
            }
            copy.strokes.push(cloned);
        }
        let new_id = copy.id;
        self.pages.push(copy);
        self.current = new_id;
        Ok(new_id)
    }

    /// Make `id` the current page. The caller must have saved the
    /// outgoing page's live state first.
    pub fn set_current(&mut self, id: PageId) -> Result<(), PageError> {
        if self.get(id).is_none() {
            return Err(PageError::NotFound(id));
        }
        self.current = id;
        Ok(())
    }

    /// Snapshot live session state back into a page record.
    pub fn save_into(
        &mut self,
        id: PageId,
        strokes: Vec<Stroke>,
        assistance_points: Vec<AssistancePoint>,
        now: Millis,
    ) -> Result<(), PageError> {
        let page = self.get_mut(id).ok_or(PageError::NotFound(id))?;
        page.strokes = strokes;
        page.assistance_points = assistance_points;
        page.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::stroke::Pen;
    use kurbo::Point;

    fn pen() -> Stroke {
        Stroke::Pen(Pen::from_points(
            vec![Point::ZERO, Point::new(5.0, 5.0)],
            Rgba::black(),
            4.0,
        ))
    }

    #[test]
    fn test_starts_with_one_page() {
        let manager = PageManager::new(0);
        assert_eq!(manager.pages().len(), 1);
        assert_eq!(manager.current().name, "Page 1");
    }

    #[test]
    fn test_add_switches_current() {
        let mut manager = PageManager::new(0);
        let id = manager.add_page(10);
        assert_eq!(manager.current_id(), id);
        assert_eq!(manager.current().name, "Page 2");
    }

    #[test]
    fn test_delete_last_page_rejected() {
        let mut manager = PageManager::new(0);
        let id = manager.current_id();
        assert_eq!(manager.delete_page(id), Err(PageError::LastPage));
        assert_eq!(manager.pages().len(), 1);
    }

    #[test]
    fn test_delete_current_falls_back_to_first() {
        let mut manager = PageManager::new(0);
        let first = manager.current_id();
        let second = manager.add_page(5);
        assert!(manager.delete_page(second).is_ok());
        assert_eq!(manager.current_id(), first);
    }

    #[test]
    fn test_rename_updates_timestamp() {
        let mut manager = PageManager::new(0);
        let id = manager.current_id();
        manager.rename_page(id, "Algebra".to_string(), 42).unwrap();
        assert_eq!(manager.current().name, "Algebra");
        assert_eq!(manager.current().updated_at, 42);
    }

    #[test]
    fn test_duplicate_copies_strokes_with_fresh_ids() {
        let mut manager = PageManager::new(0);
        let id = manager.current_id();
        let stroke = pen();
        let original_id = stroke.id();
        manager
            .save_into(id, vec![stroke], Vec::new(), 1)
            .unwrap();
        let copy_id = manager.duplicate_page(id, 2).unwrap();
        assert_eq!(manager.current_id(), copy_id);
        let copy = manager.get(copy_id).unwrap();
        assert_eq!(copy.name, "Page 1 (Copy)");
        assert_eq!(copy.strokes.len(), 1);
        assert_ne!(copy.strokes[0].id(), original_id);
        // originals untouched
        assert_eq!(manager.get(id).unwrap().strokes[0].id(), original_id);
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let mut manager = PageManager::new(0);
        let first = manager.current_id();
        manager.save_into(first, vec![pen(), pen()], Vec::new(), 1).unwrap();
        let second = manager.add_page(2);
        assert!(manager.get(second).unwrap().strokes.is_empty());
        manager.set_current(first).unwrap();
        assert_eq!(manager.current().strokes.len(), 2);
    }
}
