use crate::errors::ApiError;
use crate::models::company::{Company, CompanyLocation};
use crate::models::message::Message;
use crate::models::profile::{Profile, ProfileSnapshot, UserTag};
use crate::models::review::{CompanyReview, ReviewType};
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Everything the demo serves lives here. Nothing survives a restart.
#[derive(Default)]
pub struct State {
    pub profiles: Vec<Profile>,
    pub user_tags: Vec<UserTag>,
    pub companies: Vec<Company>,
    pub company_locations: Vec<CompanyLocation>,
    pub reviews: Vec<CompanyReview>,
    pub messages: Vec<Message>,
    /// session token -> user id
    pub sessions: HashMap<String, String>,
}

#[derive(Clone)]
pub struct Store(Arc<RwLock<State>>);

impl Store {
    pub fn new(state: State) -> Self {
        Self(Arc::new(RwLock::new(state)))
    }

    pub fn read(&self) -> Result<RwLockReadGuard<'_, State>, ApiError> {
        Ok(self.0.read()?)
    }

    pub fn write(&self) -> Result<RwLockWriteGuard<'_, State>, ApiError> {
        Ok(self.0.write()?)
    }

    pub fn with_demo_data() -> Self {
        Self::new(demo_state())
    }
}

fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0)
        .single()
        .expect("valid seed timestamp")
}

/// Demo content shown to every visitor.
pub fn demo_state() -> State {
    let demo_user = Profile {
        id: "demo-user-1".to_string(),
        email: "demo@mail.kyutech.jp".to_string(),
        full_name: Some("デモユーザー".to_string()),
        student_id: None,
        department: Some("知能情報工学科".to_string()),
        faculty: Some("情報工学部".to_string()),
        graduation_year: Some(2026),
        is_alumni: false,
        bio: None,
        location: None,
        avatar_url: None,
        points: 0,
        created_at: ts(2023, 4, 1, 9, 0),
        updated_at: ts(2023, 4, 1, 9, 0),
    };
    let yamada = Profile {
        id: "user-1".to_string(),
        email: "yamada@mail.kyutech.jp".to_string(),
        full_name: Some("山田 太郎".to_string()),
        student_id: None,
        department: Some("知能情報工学科".to_string()),
        faculty: Some("情報工学部".to_string()),
        graduation_year: Some(2024),
        is_alumni: true,
        bio: Some("トヨタ自動車でソフトウェアエンジニアとして働いています".to_string()),
        location: Some("愛知県名古屋市".to_string()),
        avatar_url: None,
        points: 150,
        created_at: ts(2022, 4, 1, 9, 0),
        updated_at: ts(2024, 1, 5, 9, 0),
    };
    let tanaka = Profile {
        id: "user-2".to_string(),
        email: "tanaka@mail.kyutech.jp".to_string(),
        full_name: Some("田中 花子".to_string()),
        student_id: None,
        department: Some("情報・通信工学科".to_string()),
        faculty: Some("情報工学部".to_string()),
        graduation_year: Some(2025),
        is_alumni: false,
        bio: Some("IT企業を中心に就活中です".to_string()),
        location: Some("福岡県福岡市".to_string()),
        avatar_url: None,
        points: 80,
        created_at: ts(2023, 4, 1, 9, 0),
        updated_at: ts(2024, 2, 1, 9, 0),
    };

    let user_tags = [
        ("user-1", "本選考通過"),
        ("user-1", "ES通過"),
        ("user-1", "面接経験"),
        ("user-2", "インターン参加"),
        ("user-2", "ES通過"),
    ]
    .iter()
    .enumerate()
    .map(|(i, (user_id, tag))| UserTag {
        id: format!("tag-{}", i + 1),
        user_id: (*user_id).to_string(),
        tag: (*tag).to_string(),
        created_at: ts(2024, 1, 1, 0, 0),
    })
    .collect();

    let companies = vec![
        Company {
            id: "company-1".to_string(),
            name: "サイボウズ株式会社".to_string(),
            industry: Some("IT・通信".to_string()),
            description: Some("グループウェアの開発・販売を行う企業".to_string()),
            website: Some("https://cybozu.co.jp".to_string()),
            logo_url: None,
            created_at: ts(2023, 1, 1, 0, 0),
            updated_at: ts(2023, 1, 1, 0, 0),
        },
        Company {
            id: "company-2".to_string(),
            name: "株式会社メルカリ".to_string(),
            industry: Some("IT・通信".to_string()),
            description: Some("フリマアプリ「メルカリ」を運営".to_string()),
            website: Some("https://about.mercari.com".to_string()),
            logo_url: None,
            created_at: ts(2023, 1, 1, 0, 0),
            updated_at: ts(2023, 1, 1, 0, 0),
        },
        Company {
            id: "company-3".to_string(),
            name: "トヨタ自動車株式会社".to_string(),
            industry: Some("自動車・輸送機器".to_string()),
            description: Some("世界的な自動車メーカー".to_string()),
            website: Some("https://global.toyota".to_string()),
            logo_url: None,
            created_at: ts(2023, 1, 1, 0, 0),
            updated_at: ts(2023, 1, 1, 0, 0),
        },
    ];

    let company_locations = vec![CompanyLocation {
        id: "loc-1".to_string(),
        company_id: "company-1".to_string(),
        address: "東京都渋谷区".to_string(),
        city: Some("東京都".to_string()),
        prefecture: Some("東京都".to_string()),
        latitude: Some(35.6586),
        longitude: Some(139.7454),
    }];

    let reviews = vec![
        CompanyReview {
            id: "review-1".to_string(),
            company_id: "company-1".to_string(),
            user_id: "user-1".to_string(),
            review_type: ReviewType::Internship,
            title: "2023年夏季インターン体験談".to_string(),
            content: "非常に有意義なインターンでした。実際の業務に近い課題に取り組めました。"
                .to_string(),
            rating: 5,
            is_online: Some(false),
            location: Some("東京都渋谷区".to_string()),
            passed: Some(true),
            created_at: ts(2023, 8, 15, 0, 0),
            updated_at: ts(2023, 8, 15, 0, 0),
        },
        CompanyReview {
            id: "review-2".to_string(),
            company_id: "company-2".to_string(),
            user_id: "user-2".to_string(),
            review_type: ReviewType::Interview,
            title: "一次面接の様子".to_string(),
            content: "オンラインでの面接でした。技術的な質問が多かったです。".to_string(),
            rating: 4,
            is_online: Some(true),
            location: None,
            passed: Some(true),
            created_at: ts(2024, 3, 20, 0, 0),
            updated_at: ts(2024, 3, 20, 0, 0),
        },
    ];

    let messages = vec![
        Message {
            id: "msg-1".to_string(),
            sender_id: demo_user.id.clone(),
            receiver_id: yamada.id.clone(),
            content: "インターンについて教えていただけますか?".to_string(),
            is_read: true,
            created_at: ts(2024, 1, 10, 10, 0),
            sender: Some(ProfileSnapshot::from(&demo_user)),
            receiver: Some(ProfileSnapshot::from(&yamada)),
        },
        Message {
            id: "msg-2".to_string(),
            sender_id: yamada.id.clone(),
            receiver_id: demo_user.id.clone(),
            content: "もちろんです。何でも聞いてください!".to_string(),
            is_read: true,
            created_at: ts(2024, 1, 10, 10, 5),
            sender: Some(ProfileSnapshot::from(&yamada)),
            receiver: Some(ProfileSnapshot::from(&demo_user)),
        },
    ];

    State {
        profiles: vec![demo_user, yamada, tanaka],
        user_tags,
        companies,
        company_locations,
        reviews,
        messages,
        sessions: HashMap::new(),
    }
}
