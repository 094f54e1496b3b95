use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::rooms::models::{Room, RoomFields, RoomUpdate};
use crate::storage::ids::time_id;
use crate::storage::{read_json, write_json, SharedStore, StoreError, ROOMS_KEY};

/// All interview rooms, kept as one `interviewRooms` document.
///
/// Ownership is a filter on `user_id`; nothing here stops one owner's id
/// from touching another owner's room. Callers check ownership.
#[derive(Clone)]
pub struct RoomStore {
    store: SharedStore,
    write_lock: Arc<Mutex<()>>,
}

impl RoomStore {
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn create(&self, owner_id: &str, fields: RoomFields) -> Result<String, StoreError> {
        let _guard = self.write_lock.lock();
        let mut rooms = self.load_all()?;

        let room = Room::new(time_id(), owner_id, fields, Utc::now());
        let room_id = room.id.clone();
        rooms.push(room);
        self.save_all(&rooms)?;

        info!("Created room {room_id} for account {owner_id}");
        Ok(room_id)
    }

    /// Partial replacement. Unknown ids change nothing.
    pub fn update(&self, room_id: &str, update: &RoomUpdate) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();
        let mut rooms = self.load_all()?;

        match rooms.iter_mut().find(|room| room.id == room_id) {
            Some(room) => room.apply(update),
            None => debug!("Update of unknown room {room_id} ignored"),
        }
        self.save_all(&rooms)
    }

    /// Removes the room. Unknown ids are a no-op.
    pub fn delete(&self, room_id: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();
        let mut rooms = self.load_all()?;

        let before = rooms.len();
        rooms.retain(|room| room.id != room_id);
        if rooms.len() != before {
            info!("Deleted room {room_id}");
        }
        self.save_all(&rooms)
    }

    pub fn get(&self, room_id: &str) -> Result<Option<Room>, StoreError> {
        Ok(self.load_all()?.into_iter().find(|room| room.id == room_id))
    }

    /// Rooms owned by `owner_id`, in creation order.
    pub fn list_for_owner(&self, owner_id: &str) -> Result<Vec<Room>, StoreError> {
        Ok(self
            .load_all()?
            .into_iter()
            .filter(|room| room.user_id == owner_id)
            .collect())
    }

    fn load_all(&self) -> Result<Vec<Room>, StoreError> {
        Ok(read_json(self.store.as_ref(), ROOMS_KEY)?.unwrap_or_default())
    }

    fn save_all(&self, rooms: &[Room]) -> Result<(), StoreError> {
        write_json(self.store.as_ref(), ROOMS_KEY, rooms)
    }
}
