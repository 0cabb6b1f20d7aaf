//! # Reader Module
//!
//! Định nghĩa Gender, Reader và Registry - sổ độc giả của thư viện.
//! Mỗi độc giả có thẻ thư viện với hạn sử dụng; thẻ hết hạn thì
//! không được mượn sách nữa.

use crate::error::{CoreError, CoreResult};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sức chứa tối đa của Registry
pub const MAX_READERS: usize = 1000;

/// Hạn thẻ: 48 tháng, mỗi tháng tính tròn 30 ngày
pub const CARD_VALIDITY_DAYS: i64 = 48 * 30;

/// Giới tính của độc giả.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Trả về code string cho file lưu trữ
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    /// Parse từ string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            _ => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Một độc giả đã đăng ký thẻ thư viện.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reader {
    /// Mã độc giả, cấp tuần tự và không tái sử dụng
    pub id: u32,
    /// Họ tên
    pub name: String,
    /// Số CMND/CCCD
    pub national_id: String,
    /// Ngày sinh
    pub birth_date: NaiveDate,
    /// Giới tính
    pub gender: Gender,
    /// Email liên hệ
    pub email: String,
    /// Số điện thoại
    pub phone: String,
    /// Địa chỉ
    pub address: String,
    /// Thời điểm cấp thẻ
    pub card_issued_at: DateTime<Utc>,
    /// Năm gia nhập (năm dương lịch lúc đăng ký)
    pub membership_year: i32,
}

impl Reader {
    /// Thời điểm thẻ hết hạn
    pub fn card_expires_at(&self) -> DateTime<Utc> {
        self.card_issued_at + Duration::days(CARD_VALIDITY_DAYS)
    }

    /// Thẻ còn hiệu lực tại thời điểm `now` không
    pub fn card_valid_at(&self, now: DateTime<Utc>) -> bool {
        now <= self.card_expires_at()
    }
}

impl fmt::Display for Reader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {} ({})", self.id, self.name, self.national_id)
    }
}

/// Thông tin đăng ký độc giả mới; id và thẻ do Registry cấp.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub national_id: String,
    pub birth_date: NaiveDate,
    pub gender: Gender,
    pub email: String,
    pub phone: String,
    pub address: String,
}

/// Cập nhật từng field của Reader; field `None` giữ nguyên giá trị cũ.
///
/// Không cho sửa id, thẻ và năm gia nhập qua patch.
#[derive(Debug, Clone, Default)]
pub struct ReaderPatch {
    pub name: Option<String>,
    pub national_id: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Sổ độc giả của thư viện.
///
/// Cấp id tuần tự bắt đầu từ 1; id của độc giả đã xóa không được
/// cấp lại. Readers giữ theo thứ tự đăng ký, lookup là linear scan.
#[derive(Debug)]
pub struct Registry {
    readers: Vec<Reader>,
    next_id: u32,
    capacity: usize,
}

impl Registry {
    /// Tạo Registry với sức chứa mặc định
    pub fn new() -> Self {
        Self::bounded(MAX_READERS)
    }

    /// Tạo Registry với sức chứa cho trước (dùng trong tests)
    pub fn bounded(capacity: usize) -> Self {
        Self {
            readers: Vec::new(),
            next_id: 1,
            capacity,
        }
    }

    /// Đăng ký độc giả mới tại thời điểm `now`.
    ///
    /// Cấp id kế tiếp, đóng dấu thời điểm cấp thẻ và năm gia nhập.
    /// Trả về id vừa cấp.
    pub fn register(&mut self, registration: Registration, now: DateTime<Utc>) -> CoreResult<u32> {
        if self.readers.len() >= self.capacity {
            return Err(CoreError::RegistryFull(self.capacity));
        }
        let id = self.next_id;
        self.next_id += 1;
        self.readers.push(Reader {
            id,
            name: registration.name,
            national_id: registration.national_id,
            birth_date: registration.birth_date,
            gender: registration.gender,
            email: registration.email,
            phone: registration.phone,
            address: registration.address,
            card_issued_at: now,
            membership_year: now.year(),
        });
        Ok(id)
    }

    /// Nạp lại một Reader đã có id (dùng khi load file).
    ///
    /// Đẩy `next_id` lên để id cũ không bao giờ bị cấp lại.
    pub fn insert(&mut self, reader: Reader) -> CoreResult<()> {
        if self.readers.len() >= self.capacity {
            return Err(CoreError::RegistryFull(self.capacity));
        }
        if self.find_by_id(reader.id).is_some() {
            return Err(CoreError::DuplicateReader(reader.id));
        }
        if reader.id >= self.next_id {
            self.next_id = reader.id + 1;
        }
        self.readers.push(reader);
        Ok(())
    }

    /// Tìm độc giả theo id
    pub fn find_by_id(&self, id: u32) -> Option<&Reader> {
        self.readers.iter().find(|r| r.id == id)
    }

    /// Tìm độc giả theo id, trả về mutable reference
    pub fn find_by_id_mut(&mut self, id: u32) -> Option<&mut Reader> {
        self.readers.iter_mut().find(|r| r.id == id)
    }

    /// Tìm độc giả theo số CMND/CCCD (exact match)
    pub fn find_by_national_id(&self, national_id: &str) -> Option<&Reader> {
        self.readers.iter().find(|r| r.national_id == national_id)
    }

    /// Cập nhật các field có trong patch; field vắng giữ nguyên
    pub fn update(&mut self, id: u32, patch: ReaderPatch) -> CoreResult<()> {
        let reader = self
            .find_by_id_mut(id)
            .ok_or(CoreError::ReaderNotFound(id))?;
        if let Some(name) = patch.name {
            reader.name = name;
        }
        if let Some(national_id) = patch.national_id {
            reader.national_id = national_id;
        }
        if let Some(birth_date) = patch.birth_date {
            reader.birth_date = birth_date;
        }
        if let Some(gender) = patch.gender {
            reader.gender = gender;
        }
        if let Some(email) = patch.email {
            reader.email = email;
        }
        if let Some(phone) = patch.phone {
            reader.phone = phone;
        }
        if let Some(address) = patch.address {
            reader.address = address;
        }
        Ok(())
    }

    /// Xóa độc giả khỏi sổ, trả về record đã xóa.
    ///
    /// Id đã cấp không được tái sử dụng cho độc giả sau.
    pub fn remove(&mut self, id: u32) -> CoreResult<Reader> {
        let index = self
            .readers
            .iter()
            .position(|r| r.id == id)
            .ok_or(CoreError::ReaderNotFound(id))?;
        Ok(self.readers.remove(index))
    }

    /// Tìm theo họ tên (substring match)
    pub fn search_by_name(&self, term: &str) -> Vec<&Reader> {
        self.readers
            .iter()
            .filter(|r| r.name.contains(term))
            .collect()
    }

    /// Tìm theo họ tên hoặc email
    pub fn search(&self, term: &str) -> Vec<&Reader> {
        self.readers
            .iter()
            .filter(|r| r.name.contains(term) || r.email.contains(term))
            .collect()
    }

    /// Iterator qua toàn bộ độc giả, theo thứ tự đăng ký
    pub fn iter(&self) -> impl Iterator<Item = &Reader> {
        self.readers.iter()
    }

    /// Số độc giả hiện có
    pub fn len(&self) -> usize {
        self.readers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readers.is_empty()
    }

    /// Sức chứa tối đa
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_registration(name: &str, national_id: &str) -> Registration {
        Registration {
            name: name.to_string(),
            national_id: national_id.to_string(),
            birth_date: "1995-04-12".parse().unwrap(),
            gender: Gender::Female,
            email: format!("{}@example.com", national_id),
            phone: "0901234567".to_string(),
            address: "12 Ly Thuong Kiet, Ha Noi".to_string(),
        }
    }

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_gender_str() {
        assert_eq!(Gender::Male.as_str(), "male");
        assert_eq!(Gender::Female.as_str(), "female");
        assert_eq!(Gender::from_str("FEMALE"), Some(Gender::Female));
        assert_eq!(Gender::from_str("unknown"), None);
    }

    #[test]
    fn test_register_assigns_sequential_ids() {
        let mut registry = Registry::new();
        let now = at(2024, 1, 15);

        let a = registry.register(sample_registration("An", "012345678901"), now).unwrap();
        let b = registry.register(sample_registration("Binh", "012345678902"), now).unwrap();
        assert_eq!(a, 1);
        assert_eq!(b, 2);

        let reader = registry.find_by_id(a).unwrap();
        assert_eq!(reader.name, "An");
        assert_eq!(reader.membership_year, 2024);
        assert_eq!(reader.card_issued_at, now);
    }

    #[test]
    fn test_removed_id_is_never_reused() {
        let mut registry = Registry::new();
        let now = at(2024, 1, 15);

        let a = registry.register(sample_registration("An", "012345678901"), now).unwrap();
        registry.remove(a).unwrap();

        let b = registry.register(sample_registration("Binh", "012345678902"), now).unwrap();
        assert_eq!(b, 2);
        assert!(registry.find_by_id(a).is_none());
    }

    #[test]
    fn test_card_validity_window() {
        let mut registry = Registry::new();
        let issued = at(2024, 1, 1);
        let id = registry.register(sample_registration("An", "012345678901"), issued).unwrap();
        let reader = registry.find_by_id(id).unwrap();

        assert_eq!(reader.card_expires_at(), issued + Duration::days(1440));
        assert!(reader.card_valid_at(issued));
        assert!(reader.card_valid_at(reader.card_expires_at()));
        assert!(!reader.card_valid_at(reader.card_expires_at() + Duration::seconds(1)));
    }

    #[test]
    fn test_insert_bumps_next_id() {
        let mut registry = Registry::new();
        let now = at(2024, 3, 1);
        let mut reader = Reader {
            id: 7,
            name: "Chi".to_string(),
            national_id: "012345678903".to_string(),
            birth_date: "1990-09-01".parse().unwrap(),
            gender: Gender::Male,
            email: "chi@example.com".to_string(),
            phone: "0987654321".to_string(),
            address: "45 Tran Phu, Da Nang".to_string(),
            card_issued_at: now,
            membership_year: 2024,
        };
        registry.insert(reader.clone()).unwrap();

        // Id trùng bị từ chối
        reader.national_id = "012345678904".to_string();
        assert!(matches!(
            registry.insert(reader),
            Err(CoreError::DuplicateReader(7))
        ));

        // Id mới cấp phải vượt qua id đã nạp
        let next = registry.register(sample_registration("Dung", "012345678905"), now).unwrap();
        assert_eq!(next, 8);
    }

    #[test]
    fn test_update_partial() {
        let mut registry = Registry::new();
        let now = at(2024, 1, 15);
        let id = registry.register(sample_registration("An", "012345678901"), now).unwrap();

        let patch = ReaderPatch {
            phone: Some("0911222333".to_string()),
            address: Some("99 Le Loi, Hue".to_string()),
            ..Default::default()
        };
        registry.update(id, patch).unwrap();

        let reader = registry.find_by_id(id).unwrap();
        assert_eq!(reader.phone, "0911222333");
        assert_eq!(reader.address, "99 Le Loi, Hue");
        assert_eq!(reader.name, "An");

        assert!(matches!(
            registry.update(42, ReaderPatch::default()),
            Err(CoreError::ReaderNotFound(42))
        ));
    }

    #[test]
    fn test_registry_capacity() {
        let mut registry = Registry::bounded(1);
        let now = at(2024, 1, 15);
        registry.register(sample_registration("An", "012345678901"), now).unwrap();

        let err = registry
            .register(sample_registration("Binh", "012345678902"), now)
            .unwrap_err();
        assert!(matches!(err, CoreError::RegistryFull(1)));
    }

    #[test]
    fn test_search_and_lookup() {
        let mut registry = Registry::new();
        let now = at(2024, 1, 15);
        registry.register(sample_registration("Nguyen Van An", "012345678901"), now).unwrap();
        registry.register(sample_registration("Tran Thi Binh", "012345678902"), now).unwrap();

        assert_eq!(registry.search_by_name("Nguyen").len(), 1);
        assert_eq!(registry.search("012345678902@example.com").len(), 1);
        assert!(registry.search_by_name("Pham").is_empty());

        let found = registry.find_by_national_id("012345678902").unwrap();
        assert_eq!(found.name, "Tran Thi Binh");
        assert!(registry.find_by_national_id("000000000000").is_none());
    }
}
