//! GraphQL documents for the Helio Additive API.
//!
//! One constant per operation the client exposes. Status queries are kept
//! slim so the polling loop moves as few bytes as possible; the full result
//! shape is fetched once, after completion.

pub const QUERY_PRESIGNED_URL: &str = "\
query getPresignedUrl($fileName: String!) {
  getPresignedUrl(fileName: $fileName) {
    mimeType
    url
    key
  }
}";

pub const MUTATION_CREATE_GCODE: &str = "\
mutation CreateGcode($input: CreateGcodeInputV2!) {
  createGcodeV2(input: $input) {
    id
    name
    sizeKb
    status
    progress
  }
}";

pub const QUERY_POLL_GCODE: &str = "\
query GcodeV2($id: ID!) {
  gcodeV2(id: $id) {
    id
    name
    sizeKb
    status
    progress
    errors
    errorsV2 {
      line
      type
    }
  }
}";

pub const MUTATION_CREATE_SIMULATION: &str = "\
mutation CreateSimulation($input: CreateSimulationInput!) {
  createSimulation(input: $input) {
    id
    name
    status
    progress
  }
}";

pub const QUERY_SIMULATION_STATUS: &str = "\
query SimulationStatus($id: ID!) {
  simulation(id: $id) {
    id
    status
    progress
    failureReason
  }
}";

pub const QUERY_SIMULATION_RESULT: &str = "\
query Simulation($id: ID!) {
  simulation(id: $id) {
    id
    name
    progress
    thermalIndexGcodeUrl
    printInfo {
      printOutcome
      printOutcomeDescription
      temperatureDirection
      temperatureDirectionDescription
      caveats {
        caveatType
        description
      }
    }
    speedFactor
    suggestedFixes {
      category
      extraDetails
      fix
      orderIndex
    }
  }
}";

pub const MUTATION_CREATE_OPTIMIZATION: &str = "\
mutation CreateOptimization($input: CreateOptimizationInput!) {
  createOptimization(input: $input) {
    id
    name
    status
    progress
  }
}";

pub const QUERY_OPTIMIZATION_STATUS: &str = "\
query OptimizationStatus($id: ID!) {
  optimization(id: $id) {
    id
    status
    progress
    failureReason
  }
}";

pub const QUERY_OPTIMIZATION_RESULT: &str = "\
query Optimization($id: ID!) {
  optimization(id: $id) {
    id
    name
    progress
    optimizedGcodeWithThermalIndexesUrl
    qualityStdImprovement
    qualityMeanImprovement
  }
}";

pub const QUERY_PRINTERS: &str = "\
query GetPrinters($page: Int) {
  printers(page: $page, pageSize: 20) {
    pages
    pageInfo { hasNextPage }
    objects {
      ... on Printer {
        id
        name
        alternativeNames { bambustudio }
      }
    }
  }
}";

pub const QUERY_MATERIALS: &str = "\
query GetMaterials($page: Int) {
  materials(page: $page, pageSize: 20) {
    pages
    pageInfo { hasNextPage }
    objects {
      ... on Material {
        id
        name
        feedstock
        alternativeNames { bambustudio }
      }
    }
  }
}";

pub const QUERY_PRINT_PRIORITY_OPTIONS: &str = "\
query GetPrintPriorityOptions($materialId: ID!) {
  printPriorityOptions(materialId: $materialId) {
    value
    label
    isAvailable
    description
  }
}";

pub const QUERY_USER_QUOTA: &str = "\
query GetUserRemainingOpts {
  user {
    remainingOptsThisMonth
    addOnOptimizations
    isFreeTrialActive
    isFreeTrialClaimed
    subscription { name }
  }
  freeTrialEligibility
}";

pub const QUERY_DEFAULT_OPT_SETTINGS: &str = "\
query DefaultOptimizationSettings($gcodeId: ID!) {
  defaultOptimizationSettings(gcodeId: $gcodeId) {
    minVelocity
    maxVelocity
    minVelocityIncrement
    minExtruderFlowRate
    maxExtruderFlowRate
    tolerance
    maxIterations
    reductionStrategySettings {
      strategy
      autolinearDoCriticality
      autolinearDoFitness
      autolinearDoInterpolation
      autolinearCriticalityMaxNodesDensity
      autolinearCriticalityThreshold
      autolinearFitnessMaxNodesDensity
      autolinearFitnessThreshold
      autolinearInterpolationLevels
      linearNodesLimit
    }
    residualStrategySettings {
      strategy
      exponentialPenaltyHigh
      exponentialPenaltyLow
    }
    layersToOptimize {
      fromLayer
      toLayer
    }
    optimizer
  }
}";

pub const QUERY_RECENT_RUNS: &str = "\
query GetRecentRuns {
  optimizations {
    objects {
      ... on Optimization {
        id
        name
        status
        optimizedGcodeWithThermalIndexesUrl
        qualityMeanImprovement
        qualityStdImprovement
        gcode {
          gcodeUrl
          gcodeKey
          material { id name }
          printer { id name }
          numberOfLayers
          slicer
        }
      }
    }
  }
  simulations {
    objects {
      ... on Simulation {
        id
        name
        status
        thermalIndexGcodeUrl
        gcode {
          gcodeUrl
          gcodeKey
          material { id name }
          printer { id name }
          numberOfLayers
          slicer
        }
        printInfo {
          printOutcome
        }
      }
    }
  }
}";

pub const QUERY_SIMULATION_MESH: &str = "\
query SimulationMesh($id: ID!) {
  simulation(id: $id) {
    meshUrl {
      assetType
      url
    }
  }
}";

pub const QUERY_OPTIMIZATION_MESH: &str = "\
query OptimizationMesh($id: ID!) {
  optimization(id: $id) {
    optimizedMeshAsset {
      assetType
      url
    }
    originalMeshAsset {
      assetType
      url
    }
  }
}";
