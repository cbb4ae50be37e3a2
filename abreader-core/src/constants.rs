//! Built-in lookup data
//!
//! Class ids and texture-format codes as assigned by the Unity runtime.
//! The built-in tables are constructed lazily on first use and shared.

use crate::name_table::NameTable;

/// Class ids the decoder routes on
pub mod class_ids {
    pub const OBJECT: i32 = 0;
    pub const GAME_OBJECT: i32 = 1;
    pub const TRANSFORM: i32 = 4;
    pub const MATERIAL: i32 = 21;
    pub const TEXTURE_2D: i32 = 28;
    pub const MESH: i32 = 43;
    pub const SHADER: i32 = 48;
    pub const TEXT_ASSET: i32 = 49;
    pub const MONO_BEHAVIOUR: i32 = 114;
    pub const MONO_SCRIPT: i32 = 115;
    pub const ASSET_BUNDLE: i32 = 142;
    pub const SPRITE: i32 = 213;
}

/// Texture format codes with dedicated decode paths
pub mod texture_formats {
    pub const RGBA32: i32 = 4;
    pub const ETC2_RGBA8: i32 = 47;
}

const CLASS_NAMES: &[(i32, &str)] = &[
    (0, "Object"),
    (1, "GameObject"),
    (2, "Component"),
    (3, "LevelGameManager"),
    (4, "Transform"),
    (5, "TimeManager"),
    (6, "GlobalGameManager"),
    (8, "Behaviour"),
    (9, "GameManager"),
    (11, "AudioManager"),
    (13, "InputManager"),
    (18, "EditorExtension"),
    (19, "Physics2DSettings"),
    (20, "Camera"),
    (21, "Material"),
    (23, "MeshRenderer"),
    (25, "Renderer"),
    (27, "Texture"),
    (28, "Texture2D"),
    (29, "OcclusionCullingSettings"),
    (30, "GraphicsSettings"),
    (33, "MeshFilter"),
    (41, "OcclusionPortal"),
    (43, "Mesh"),
    (45, "Skybox"),
    (47, "QualitySettings"),
    (48, "Shader"),
    (49, "TextAsset"),
    (50, "Rigidbody2D"),
    (53, "Collider2D"),
    (54, "Rigidbody"),
    (55, "PhysicsManager"),
    (56, "Collider"),
    (57, "Joint"),
    (58, "CircleCollider2D"),
    (59, "HingeJoint"),
    (60, "PolygonCollider2D"),
    (61, "BoxCollider2D"),
    (62, "PhysicsMaterial2D"),
    (64, "MeshCollider"),
    (65, "BoxCollider"),
    (66, "CompositeCollider2D"),
    (68, "EdgeCollider2D"),
    (70, "CapsuleCollider2D"),
    (72, "ComputeShader"),
    (74, "AnimationClip"),
    (75, "ConstantForce"),
    (78, "TagManager"),
    (81, "AudioListener"),
    (82, "AudioSource"),
    (83, "AudioClip"),
    (84, "RenderTexture"),
    (86, "CustomRenderTexture"),
    (89, "Cubemap"),
    (90, "Avatar"),
    (91, "AnimatorController"),
    (93, "RuntimeAnimatorController"),
    (94, "ScriptMapper"),
    (95, "Animator"),
    (96, "TrailRenderer"),
    (98, "DelayedCallManager"),
    (102, "TextMesh"),
    (104, "RenderSettings"),
    (108, "Light"),
    (109, "CGProgram"),
    (111, "Animation"),
    (114, "MonoBehaviour"),
    (115, "MonoScript"),
    (116, "MonoManager"),
    (117, "Texture3D"),
    (119, "Projector"),
    (120, "LineRenderer"),
    (121, "Flare"),
    (122, "Halo"),
    (123, "LensFlare"),
    (124, "FlareLayer"),
    (128, "Font"),
    (129, "PlayerSettings"),
    (130, "NamedObject"),
    (134, "PhysicMaterial"),
    (135, "SphereCollider"),
    (136, "CapsuleCollider"),
    (137, "SkinnedMeshRenderer"),
    (138, "FixedJoint"),
    (141, "BuildSettings"),
    (142, "AssetBundle"),
    (143, "CharacterController"),
    (144, "CharacterJoint"),
    (145, "SpringJoint"),
    (146, "WheelCollider"),
    (147, "ResourceManager"),
    (150, "PreloadData"),
    (152, "MovieTexture"),
    (153, "ConfigurableJoint"),
    (154, "TerrainCollider"),
    (156, "TerrainData"),
    (157, "LightmapSettings"),
    (158, "WebCamTexture"),
    (198, "ParticleSystem"),
    (199, "ParticleSystemRenderer"),
    (200, "ShaderVariantCollection"),
    (205, "LODGroup"),
    (206, "BlendTree"),
    (207, "Motion"),
    (208, "NavMeshObstacle"),
    (210, "SortingGroup"),
    (212, "SpriteRenderer"),
    (213, "Sprite"),
    (214, "CachedSpriteAtlas"),
    (215, "ReflectionProbe"),
    (218, "Terrain"),
    (220, "LightProbeGroup"),
    (221, "AnimatorOverrideController"),
    (222, "CanvasRenderer"),
    (223, "Canvas"),
    (224, "RectTransform"),
    (225, "CanvasGroup"),
    (226, "BillboardAsset"),
    (227, "BillboardRenderer"),
    (228, "SpeedTreeWindAsset"),
    (238, "NavMeshData"),
    (240, "AudioMixer"),
    (241, "AudioMixerController"),
    (243, "AudioMixerGroupController"),
    (258, "LightProbes"),
    (290, "AssetBundleManifest"),
    (319, "AvatarMask"),
    (320, "PlayableDirector"),
    (328, "VideoPlayer"),
    (329, "VideoClip"),
    (363, "OcclusionCullingData"),
    (1001, "PrefabInstance"),
    (687078895, "SpriteAtlas"),
];

const TEXTURE_FORMAT_NAMES: &[(i32, &str)] = &[
    (1, "Alpha8"),
    (2, "ARGB4444"),
    (3, "RGB24"),
    (4, "RGBA32"),
    (5, "ARGB32"),
    (6, "ARGBFloat"),
    (7, "RGB565"),
    (8, "BGR24"),
    (9, "R16"),
    (10, "DXT1"),
    (11, "DXT3"),
    (12, "DXT5"),
    (13, "RGBA4444"),
    (14, "BGRA32"),
    (15, "RHalf"),
    (16, "RGHalf"),
    (17, "RGBAHalf"),
    (18, "RFloat"),
    (19, "RGFloat"),
    (20, "RGBAFloat"),
    (21, "YUY2"),
    (22, "RGB9e5Float"),
    (23, "RGBFloat"),
    (24, "BC6H"),
    (25, "BC7"),
    (26, "BC4"),
    (27, "BC5"),
    (28, "DXT1Crunched"),
    (29, "DXT5Crunched"),
    (30, "PVRTC_RGB2"),
    (31, "PVRTC_RGBA2"),
    (32, "PVRTC_RGB4"),
    (33, "PVRTC_RGBA4"),
    (34, "ETC_RGB4"),
    (35, "ATC_RGB4"),
    (36, "ATC_RGBA8"),
    (41, "EAC_R"),
    (42, "EAC_R_SIGNED"),
    (43, "EAC_RG"),
    (44, "EAC_RG_SIGNED"),
    (45, "ETC2_RGB"),
    (46, "ETC2_RGBA1"),
    (47, "ETC2_RGBA8"),
    (48, "ASTC_RGB_4x4"),
    (49, "ASTC_RGB_5x5"),
    (50, "ASTC_RGB_6x6"),
    (51, "ASTC_RGB_8x8"),
    (52, "ASTC_RGB_10x10"),
    (53, "ASTC_RGB_12x12"),
    (54, "ASTC_RGBA_4x4"),
    (55, "ASTC_RGBA_5x5"),
    (56, "ASTC_RGBA_6x6"),
    (57, "ASTC_RGBA_8x8"),
    (58, "ASTC_RGBA_10x10"),
    (59, "ASTC_RGBA_12x12"),
    (60, "ETC_RGB4_3DS"),
    (61, "ETC_RGBA8_3DS"),
    (62, "RG16"),
    (63, "R8"),
    (64, "ETC_RGB4Crunched"),
    (65, "ETC2_RGBA8Crunched"),
    (66, "ASTC_HDR_4x4"),
    (67, "ASTC_HDR_5x5"),
    (68, "ASTC_HDR_6x6"),
    (69, "ASTC_HDR_8x8"),
    (70, "ASTC_HDR_10x10"),
    (71, "ASTC_HDR_12x12"),
    (72, "RG32"),
    (73, "RGB48"),
    (74, "RGBA64"),
];

lazy_static::lazy_static! {
    /// Built-in class id table
    pub static ref BUILTIN_CLASS_NAMES: NameTable =
        NameTable::from_pairs("class id", CLASS_NAMES.iter().copied());

    /// Built-in texture format table
    pub static ref BUILTIN_TEXTURE_FORMATS: NameTable =
        NameTable::from_pairs("texture format", TEXTURE_FORMAT_NAMES.iter().copied());
}
